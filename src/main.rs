mod camera;
mod config;
mod geometry;
mod lighting;
mod rendering;
mod scene;

extern crate nalgebra as na;

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::{ImageFormat, RgbImage};
use log::info;

use crate::config::load_config;
use crate::rendering::render_scene;
use crate::scene::build_scene;

#[derive(Parser)]
#[command(name = "whitted-tracer")]
#[command(about = "Whitted-style recursive ray tracer")]
struct Args {
    /// Path to the JSON scene description
    #[arg(short, long)]
    config: PathBuf,

    /// Override the image width from the scene description
    #[arg(long)]
    width: Option<u32>,

    /// Override the image height from the scene description
    #[arg(long)]
    height: Option<u32>,

    /// Override the output file (.pfm for float output, .png otherwise)
    #[arg(short, long)]
    output: Option<String>,

    /// Override the render mode: 0 local lighting, 1 +shadows,
    /// 2 +reflections, 3 +refraction
    #[arg(long)]
    render_mode: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = load_config(&args.config)
        .with_context(|| format!("failed to load scene description {:?}", args.config))?;
    if let Some(width) = args.width {
        config.camera.width = width;
    }
    if let Some(height) = args.height {
        config.camera.height = height;
    }
    if let Some(output) = args.output {
        config.output_name = output;
    }
    if let Some(mode) = args.render_mode {
        config.render_type = mode;
    }

    let scene = build_scene(&config)?;
    info!(
        "rendering {}x{}, {} primitives, {} lights, mode {}",
        scene.camera.width,
        scene.camera.height,
        scene.primitives.len(),
        scene.lights.len(),
        config.render_type
    );

    let rendered_scene = render_scene(&scene);

    if config.output_name.ends_with(".pfm") {
        let mut out_file = File::create(&config.output_name)
            .with_context(|| format!("failed to create {}", config.output_name))?;
        dump_rendered_to_pfm(scene.camera.width, scene.camera.height, &rendered_scene, &mut out_file)?;
    } else {
        dump_rendered_to_png(scene.camera.width, scene.camera.height, &rendered_scene, &config.output_name)?;
    }
    info!("wrote {}", config.output_name);
    Ok(())
}

fn dump_rendered_to_png(width: u32, height: u32, rendered_scene: &[f32], png_path: &str) -> Result<()> {
    let mut img = RgbImage::new(width, height);
    for x in 0..width {
        for y in 0..height {
            for i in 0..3 {
                img.get_pixel_mut(x, y).0[i] =
                    (rendered_scene[(y * width + x) as usize * 3 + i] * 255.0).round() as u8;
            }
        }
    }
    img.save_with_format(png_path, ImageFormat::Png)
        .with_context(|| format!("failed to write {}", png_path))?;
    Ok(())
}

// Portable float map: "PF" header, rows bottom to top, little-endian
// f32 triples (the -1.0 scale marks the byte order).
fn dump_rendered_to_pfm(width: u32, height: u32, rendered_scene: &[f32], out_file: &mut File) -> Result<()> {
    out_file.write_all(b"PF\n")?;
    out_file.write_all(format!("{} {}\n", width, height).as_bytes())?;
    out_file.write_all(b"-1.0\n")?;
    for y in (0..height).rev() {
        let row_start = (y * width) as usize * 3;
        let row = &rendered_scene[row_start..row_start + width as usize * 3];
        for value in row {
            out_file.write_all(&value.to_le_bytes())?;
        }
    }
    Ok(())
}
