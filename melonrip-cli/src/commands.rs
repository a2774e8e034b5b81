// CLI command handlers
use crate::config::ExportConfig;
use crate::export::{export_scene, ExportSummary};
use anyhow::{Context, Result};
use melonrip_core::{decode_dump, RipScene};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Read and decode a dump file.
pub fn load_dump(dump_file: &Path) -> Result<RipScene> {
    let data = fs::read(dump_file)
        .with_context(|| format!("Failed to read dump file: {}", dump_file.display()))?;
    decode_dump(&data)
        .with_context(|| format!("Failed to decode dump file: {}", dump_file.display()))
}

/// Human-readable summary of a decoded scene.
pub fn describe_scene(scene: &RipScene) -> String {
    let mesh = scene.mesh();
    let rip = scene.rip();
    let mut out = String::new();

    let _ = writeln!(out, "MelonRipper dump v{}", scene.version());
    let _ = writeln!(out, "  Vertices: {}", mesh.vertex_count());
    let _ = writeln!(out, "  Faces: {}", mesh.face_count());
    let _ = writeln!(out, "  Shadow volumes skipped: {}", rip.skipped_shadow_polygons);
    let _ = writeln!(out, "  VRAM: {}", if rip.vram.is_some() { "present" } else { "missing" });
    let _ = writeln!(out, "  DISP3DCNT: 0x{:08X}", rip.disp_cnt.0);
    let _ = writeln!(out, "  Textures: {}", scene.texture_keys().len());

    let materials = scene.materials();
    let _ = writeln!(out, "  Materials: {}", materials.len());
    for (index, m) in materials.iter().enumerate() {
        let texture = m
            .texture
            .map(|key| key.file_stem())
            .unwrap_or_else(|| "untextured".to_string());
        let _ = writeln!(
            out,
            "    #{}: {} {:?} {:?} alpha {:.2}{}",
            index,
            texture,
            m.polygon_mode,
            m.blend,
            m.alpha,
            if m.toon_ramp { " toon" } else { "" }
        );
    }
    out
}

pub fn export_dump(
    dump_file: &Path,
    output_dir: &Path,
    config_file: Option<&Path>,
) -> Result<ExportSummary> {
    let config = ExportConfig::load(config_file)?;
    let mut scene = load_dump(dump_file)?;
    export_scene(&mut scene, output_dir, &config).context("Failed to export scene")
}

pub fn write_default_config(path: &Path) -> Result<()> {
    ExportConfig::default().save(path)?;
    println!("Default export config written to: {}", path.display());
    Ok(())
}
