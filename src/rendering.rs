use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::geometry::{self, Fp, Ray, Vec3f, SURFACE_OFFSET};
use crate::lighting::shade;
use crate::scene::{LightLocation, Material, Scene};

// Secondary rays whose accumulated energy weight drops below this are
// pruned; together with the depth bound this terminates the recursion
// even for unit reflectivity or transparency.
static MIN_CONTRIBUTION: Fp = 0.01;

fn closest_hit(scene: &Scene, ray: &Ray) -> Option<(usize, Fp)> {
    let mut closest: Option<(usize, Fp)> = None;
    for (index, primitive) in scene.primitives.iter().enumerate() {
        if let Some(t) = geometry::intersect_shape(ray, &primitive.shape, &primitive.position) {
            if closest.map_or(true, |(_, best)| t < best) {
                closest = Some((index, t));
            }
        }
    }
    closest
}

fn in_shadow(
    scene: &Scene,
    hit_point: &Vec3f,
    normal: &Vec3f,
    light_dir: &Vec3f,
    shaded_index: usize,
    light_distance: Option<Fp>,
) -> bool {
    if !scene.options.shadows {
        return false;
    }
    let shadow_ray = Ray {
        origin: hit_point + normal * SURFACE_OFFSET,
        direction: *light_dir,
    };
    for (index, primitive) in scene.primitives.iter().enumerate() {
        // the shaded primitive never occludes itself
        if index == shaded_index {
            continue;
        }
        if let Some(shadow_t) =
            geometry::intersect_shape(&shadow_ray, &primitive.shape, &primitive.position)
        {
            // an occluder past a positional light does not block it
            if let Some(distance) = light_distance {
                if distance < shadow_t {
                    continue;
                }
            }
            return true;
        }
    }
    false
}

fn direct_lighting(
    scene: &Scene,
    hit_point: &Vec3f,
    normal: &Vec3f,
    material: &Material,
    hit_index: usize,
) -> Vec3f {
    let mut color = Vec3f::default();
    for light in &scene.lights {
        match &light.location {
            LightLocation::Ambient => {
                color += light.intensity_at(hit_point).component_mul(&material.ambient);
            }
            location => {
                let light_dir = light.direction_to(hit_point);
                let view_dir = (scene.camera.position - hit_point).normalize();
                let light_distance = match location {
                    LightLocation::Point { position } => Some((position - hit_point).norm()),
                    _ => None,
                };
                if !in_shadow(scene, hit_point, normal, &light_dir, hit_index, light_distance) {
                    let reflected = shade(
                        normal,
                        &light_dir,
                        &view_dir,
                        material,
                        scene.options.specular_model,
                    );
                    color += light.intensity_at(hit_point).component_mul(&reflected);
                }
            }
        }
    }
    color
}

/// Trace one ray through the scene. `contribution` is the multiplicative
/// energy weight of this ray in the recursion tree; reflected and
/// refracted child rays are spawned only while both the depth bound and
/// the contribution threshold allow it.
pub fn trace_ray(
    scene: &Scene,
    origin: &Vec3f,
    direction: &Vec3f,
    depth: i32,
    contribution: Fp,
) -> Vec3f {
    if depth > scene.options.max_depth {
        return scene.bg_color;
    }

    let ray = Ray {
        origin: *origin,
        direction: *direction,
    };
    let (hit_index, t) = match closest_hit(scene, &ray) {
        Some(hit) => hit,
        None => return scene.bg_color,
    };

    let primitive = &scene.primitives[hit_index];
    let hit_point = origin + direction * t;
    let normal =
        geometry::normal_at(&primitive.shape, &primitive.position, &hit_point).normalize();
    let material = &primitive.material;

    let mut color = direct_lighting(scene, &hit_point, &normal, material, hit_index);

    if material.is_reflective && scene.options.reflections {
        let reflection_contribution = material.reflectivity * contribution;
        if reflection_contribution > MIN_CONTRIBUTION {
            let reflect_dir = geometry::reflect(direction, &normal);
            let reflect_origin = hit_point + normal * SURFACE_OFFSET;
            color += material.reflectivity
                * trace_ray(
                    scene,
                    &reflect_origin,
                    &reflect_dir,
                    depth + 1,
                    reflection_contribution,
                );
        }
    }

    if material.is_transparent && scene.options.refractions {
        let refraction_contribution = material.transparency * contribution;
        if refraction_contribution > MIN_CONTRIBUTION {
            let refract_dir = geometry::refract(direction, &normal, material.refractive_index);
            let refract_origin = hit_point - normal * SURFACE_OFFSET;
            color += material.transparency
                * trace_ray(
                    scene,
                    &refract_origin,
                    &refract_dir,
                    depth + 1,
                    refraction_contribution,
                );
        }
    }

    color
}

/// Render the whole image: one primary ray per pixel at depth 0 and full
/// contribution, clamped to [0, 1] per channel. Returns the dense
/// row-major width*height*3 buffer. Rows are traced in parallel; every
/// row writes its own disjoint slice, so the result is deterministic.
pub fn render_scene(scene: &Scene) -> Vec<f32> {
    let width = scene.camera.width;
    let height = scene.camera.height;

    let progress = ProgressBar::new(height as u64);
    progress.set_style(
        ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} rows").unwrap(),
    );

    let rows = (0..height)
        .into_par_iter()
        .progress_with(progress)
        .map(|y| {
            let mut row = Vec::with_capacity(width as usize * 3);
            for x in 0..width {
                let ray = scene.camera.generate_ray(x as Fp, y as Fp);
                let color = trace_ray(scene, &ray.origin, &ray.direction, 0, 1.0);
                row.push(color.x.clamp(0.0, 1.0) as f32);
                row.push(color.y.clamp(0.0, 1.0) as f32);
                row.push(color.z.clamp(0.0, 1.0) as f32);
            }
            row
        })
        .collect::<Vec<Vec<f32>>>();
    rows.concat()
}
