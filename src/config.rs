use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Fp;
use crate::lighting::SpecularModel;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scene description document. Everything the renderer consumes comes
/// from here; unknown object and light type tags survive parsing and are
/// dealt with at scene assembly.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub camera: CameraConfig,
    #[serde(default)]
    pub materials: Vec<MaterialConfig>,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub background_color: [Fp; 3],
    #[serde(default = "default_render_type")]
    pub render_type: u32,
    #[serde(default = "default_max_depth")]
    pub max_depth: i32,
    #[serde(default)]
    pub specular_model: SpecularModel,
    #[serde(default = "default_output_name")]
    pub output_name: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CameraConfig {
    pub position: [Fp; 3],
    pub look_at: [Fp; 3],
    pub up: [Fp; 3],
    pub field_of_view: Fp,
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MaterialConfig {
    pub name: String,
    pub ambient: [Fp; 3],
    pub diffuse: [Fp; 3],
    pub specular: [Fp; 3],
    pub shininess: Fp,
    #[serde(default)]
    pub reflectivity: Fp,
    #[serde(default)]
    pub transparency: Fp,
    #[serde(default = "default_refractive_index")]
    pub refractive_index: Fp,
    #[serde(default)]
    pub is_reflective: bool,
    #[serde(default)]
    pub is_transparent: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ObjectConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub material: String,
    pub position: [Fp; 3],
    #[serde(default)]
    pub radius: Fp,
    #[serde(default)]
    pub height: Fp,
    // Plane orientation; doubles as the cylinder axis.
    pub normal: Option<[Fp; 3]>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LightConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub intensity: [Fp; 3],
    pub position: Option<[Fp; 3]>,
    pub direction: Option<[Fp; 3]>,
}

fn default_render_type() -> u32 {
    3
}

fn default_max_depth() -> i32 {
    5
}

fn default_refractive_index() -> Fp {
    1.0
}

fn default_output_name() -> String {
    "render.pfm".to_string()
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
