//! Scene Export
//!
//! Writes a decoded [`RipScene`] to a directory:
//! - `<scene_file>`: JSON with the mesh buffers and material list
//! - `<texture_dir>/<stem>.png`: one 8-bit RGBA PNG per referenced texture
//! - `<texture_dir>/toon_ramp.png`: the 32x1 toon ramp, if any material uses it
//!
//! Paths stored in the JSON are relative to the export directory so the
//! output can be moved as a unit.

use crate::config::ExportConfig;
use anyhow::{Context, Result};
use image::{DynamicImage, Rgba32FImage};
use log::{debug, info};
use melonrip_core::mesh::FaceIndices;
use melonrip_core::{MaterialDescriptor, RipScene, TextureKey};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const TOON_RAMP_FILE: &str = "toon_ramp.png";

/// One material as written to the scene file.
#[derive(Debug, Serialize)]
pub struct MaterialEntry {
    #[serde(flatten)]
    pub descriptor: MaterialDescriptor,
    /// Texture PNG, relative to the export directory.
    pub texture_file: Option<String>,
}

/// The scene file's JSON shape.
#[derive(Debug, Serialize)]
pub struct SceneDocument<'a> {
    pub version: i64,
    pub positions: &'a [[f32; 3]],
    pub colors: &'a [[f32; 4]],
    pub uvs: &'a [[f32; 2]],
    pub faces: &'a [FaceIndices],
    pub face_materials: &'a [u32],
    pub materials: Vec<MaterialEntry>,
    pub toon_ramp_file: Option<String>,
}

/// What [`export_scene`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub scene_path: PathBuf,
    pub textures_written: usize,
    pub toon_ramp_written: bool,
}

/// Write `scene` into `out_dir` according to `config`.
pub fn export_scene(
    scene: &mut RipScene,
    out_dir: &Path,
    config: &ExportConfig,
) -> Result<ExportSummary> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let materials = scene.materials();
    let texture_dir = out_dir.join(&config.texture_dir);

    let mut texture_files: HashMap<TextureKey, String> = HashMap::new();
    if config.write_textures {
        for key in scene.texture_keys() {
            let Some(texture) = scene.texture(&key) else {
                continue;
            };
            let file_name = format!("{}.png", key.file_stem());
            write_png(&texture.image, &texture_dir, &file_name)?;
            texture_files.insert(key, relative(&config.texture_dir, &file_name));
        }
    }

    let mut toon_ramp_file = None;
    if config.write_toon_ramp && materials.iter().any(|m| m.toon_ramp) {
        let ramp = scene.toon_ramp();
        write_png(&ramp.image, &texture_dir, TOON_RAMP_FILE)?;
        toon_ramp_file = Some(relative(&config.texture_dir, TOON_RAMP_FILE));
    }

    let mesh = scene.mesh();
    let document = SceneDocument {
        version: scene.version(),
        positions: &mesh.positions,
        colors: &mesh.colors,
        uvs: &mesh.uvs,
        faces: &mesh.faces,
        face_materials: &mesh.face_materials,
        materials: materials
            .into_iter()
            .map(|descriptor| MaterialEntry {
                texture_file: descriptor
                    .texture
                    .and_then(|key| texture_files.get(&key).cloned()),
                descriptor,
            })
            .collect(),
        toon_ramp_file,
    };

    let json = if config.pretty_json {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .context("Failed to serialize scene")?;

    let scene_path = out_dir.join(&config.scene_file);
    fs::write(&scene_path, json)
        .with_context(|| format!("Failed to write scene file: {}", scene_path.display()))?;

    let summary = ExportSummary {
        scene_path,
        textures_written: texture_files.len(),
        toon_ramp_written: document.toon_ramp_file.is_some(),
    };
    info!(
        "exported {} with {} textures",
        summary.scene_path.display(),
        summary.textures_written
    );
    Ok(summary)
}

fn write_png(image: &Rgba32FImage, dir: &Path, file_name: &str) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create texture directory: {}", dir.display()))?;
    let path = dir.join(file_name);
    debug!("writing {}", path.display());
    DynamicImage::ImageRgba32F(image.clone())
        .to_rgba8()
        .save(&path)
        .with_context(|| format!("Failed to write image: {}", path.display()))
}

fn relative(dir: &str, file_name: &str) -> String {
    if dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), file_name)
    }
}
