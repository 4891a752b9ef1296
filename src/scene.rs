use std::collections::HashMap;
use std::sync::Arc;

use log::warn;
use thiserror::Error;

use crate::camera::Camera;
use crate::config::Config;
use crate::geometry::{Fp, Shape3D, Vec3f};
use crate::lighting::SpecularModel;

/// Shading and optical properties of a surface. Immutable; primitives
/// share one instance by reference.
#[derive(Clone, Debug)]
pub struct Material {
    pub ambient: Vec3f,
    pub diffuse: Vec3f,
    pub specular: Vec3f,
    pub shininess: Fp,
    pub reflectivity: Fp,
    pub transparency: Fp,
    pub refractive_index: Fp,
    pub is_reflective: bool,
    pub is_transparent: bool,
}

#[derive(Clone, Debug)]
pub struct Primitive {
    pub shape: Shape3D,
    pub position: Vec3f,
    pub material: Arc<Material>,
}

#[derive(Clone, Debug)]
pub enum LightLocation {
    Point { position: Vec3f },
    Directed { direction: Vec3f },
    Ambient,
}

#[derive(Clone, Debug)]
pub struct LightSource {
    pub intensity: Vec3f,
    pub location: LightLocation,
}

impl LightSource {
    /// Unit vector from `point` toward the light. Zero for ambient
    /// lights, which have no direction.
    pub fn direction_to(&self, point: &Vec3f) -> Vec3f {
        match &self.location {
            LightLocation::Point { position } => (position - point).normalize(),
            LightLocation::Directed { direction } => direction.normalize(),
            LightLocation::Ambient => Vec3f::default(),
        }
    }

    /// Radiance arriving at `point`. Point lights fall off with the
    /// inverse square of the distance; the other kinds are constant.
    pub fn intensity_at(&self, point: &Vec3f) -> Vec3f {
        match &self.location {
            LightLocation::Point { position } => {
                self.intensity / (position - point).norm_squared()
            }
            LightLocation::Directed { .. } | LightLocation::Ambient => self.intensity,
        }
    }
}

/// Feature switches for one render, fixed before the first ray is cast.
/// The tiers from the scene description are strict supersets: 0 is local
/// lighting only, then +shadows, +reflections, +refraction.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub shadows: bool,
    pub reflections: bool,
    pub refractions: bool,
    pub specular_model: SpecularModel,
    pub max_depth: i32,
}

impl RenderOptions {
    pub fn from_mode(mode: u32, specular_model: SpecularModel, max_depth: i32) -> RenderOptions {
        RenderOptions {
            shadows: mode >= 1,
            reflections: mode >= 2,
            refractions: mode >= 3,
            specular_model,
            max_depth,
        }
    }
}

/// Read-only scene aggregate: everything the tracer consults while
/// rendering. Nothing in here is mutated once assembly finishes.
#[derive(Clone, Debug)]
pub struct Scene {
    pub camera: Camera,
    pub primitives: Vec<Primitive>,
    pub lights: Vec<LightSource>,
    pub bg_color: Vec3f,
    pub options: RenderOptions,
}

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("object {index} references unknown material {name:?}")]
    UnknownMaterial { index: usize, name: String },
}

fn vec3(v: [Fp; 3]) -> Vec3f {
    Vec3f::new(v[0], v[1], v[2])
}

/// Assemble the immutable scene from the parsed description. Unknown
/// object and light type tags are reported and skipped; an object naming
/// a material that does not exist is fatal.
pub fn build_scene(config: &Config) -> Result<Scene, SceneError> {
    let camera = Camera::new(
        vec3(config.camera.position),
        vec3(config.camera.look_at),
        vec3(config.camera.up),
        config.camera.field_of_view,
        config.camera.width,
        config.camera.height,
    );

    let mut materials = HashMap::new();
    for mat in &config.materials {
        materials.insert(
            mat.name.clone(),
            Arc::new(Material {
                ambient: vec3(mat.ambient),
                diffuse: vec3(mat.diffuse),
                specular: vec3(mat.specular),
                shininess: mat.shininess,
                reflectivity: mat.reflectivity,
                transparency: mat.transparency,
                refractive_index: mat.refractive_index,
                is_reflective: mat.is_reflective,
                is_transparent: mat.is_transparent,
            }),
        );
    }

    let mut primitives = Vec::new();
    for (index, object) in config.objects.iter().enumerate() {
        let shape = match object.kind.as_str() {
            "Sphere" => Shape3D::Sphere {
                radius: object.radius,
            },
            "Plane" => match object.normal {
                Some(normal) => Shape3D::Plane {
                    normal: vec3(normal).normalize(),
                },
                None => {
                    warn!("plane object {} has no normal, skipping", index);
                    continue;
                }
            },
            "Cylinder" => match object.normal {
                Some(axis) => Shape3D::Cylinder {
                    axis: vec3(axis).normalize(),
                    radius: object.radius,
                    height: object.height,
                },
                None => {
                    warn!("cylinder object {} has no axis, skipping", index);
                    continue;
                }
            },
            other => {
                warn!("unknown object type {:?}, skipping", other);
                continue;
            }
        };
        let material = materials
            .get(&object.material)
            .ok_or_else(|| SceneError::UnknownMaterial {
                index,
                name: object.material.clone(),
            })?;
        primitives.push(Primitive {
            shape,
            position: vec3(object.position),
            material: Arc::clone(material),
        });
    }

    let mut lights = Vec::new();
    for (index, light) in config.lights.iter().enumerate() {
        let location = match light.kind.as_str() {
            "PointLight" => match light.position {
                Some(position) => LightLocation::Point {
                    position: vec3(position),
                },
                None => {
                    warn!("point light {} has no position, skipping", index);
                    continue;
                }
            },
            "DirectionalLight" => match light.direction {
                Some(direction) => LightLocation::Directed {
                    direction: vec3(direction).normalize(),
                },
                None => {
                    warn!("directional light {} has no direction, skipping", index);
                    continue;
                }
            },
            "AmbientLight" => LightLocation::Ambient,
            other => {
                warn!("unknown light type {:?}, skipping", other);
                continue;
            }
        };
        lights.push(LightSource {
            intensity: vec3(light.intensity),
            location,
        });
    }

    Ok(Scene {
        camera,
        primitives,
        lights,
        bg_color: vec3(config.background_color),
        options: RenderOptions::from_mode(
            config.render_type,
            config.specular_model,
            config.max_depth,
        ),
    })
}
