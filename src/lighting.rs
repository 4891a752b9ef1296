use serde::Deserialize;

use crate::geometry::{Fp, Vec3f};
use crate::scene::Material;

/// Which specular highlight approximation the shading term uses. Chosen
/// once in the scene description and threaded through the render options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecularModel {
    Phong,
    #[default]
    BlinnPhong,
}

/// Local reflectance at a surface point: Lambertian diffuse plus a
/// Phong or Blinn-Phong specular lobe. Ambient is accumulated by the
/// caller, outside the per-light shading.
pub fn shade(
    normal: &Vec3f,
    light_dir: &Vec3f,
    view_dir: &Vec3f,
    material: &Material,
    model: SpecularModel,
) -> Vec3f {
    let diff = Fp::max(normal.dot(light_dir), 0.0);
    let diffuse = material.diffuse * diff;

    let spec_angle = match model {
        SpecularModel::Phong => {
            let reflect_dir = light_dir - normal * (2.0 * light_dir.dot(normal));
            Fp::max(view_dir.dot(&reflect_dir.normalize()), 0.0)
        }
        SpecularModel::BlinnPhong => {
            let half_dir = (light_dir + view_dir).normalize();
            Fp::max(normal.dot(&half_dir), 0.0)
        }
    };
    let specular = material.specular * spec_angle.powf(material.shininess);

    diffuse + specular
}
