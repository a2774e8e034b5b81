// Export settings
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write a PNG for every texture a material references.
    pub write_textures: bool,
    /// Write `toon_ramp.png` when a material samples the toon ramp.
    pub write_toon_ramp: bool,
    pub pretty_json: bool,
    /// Texture directory, relative to the export directory.
    pub texture_dir: String,
    /// Scene file name, relative to the export directory.
    pub scene_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            write_textures: true,
            write_toon_ramp: true,
            pretty_json: true,
            texture_dir: "textures".to_string(),
            scene_file: "scene.json".to_string(),
        }
    }
}

impl ExportConfig {
    /// Load from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ExportConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
