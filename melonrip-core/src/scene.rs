//! Scene Description
//!
//! [`RipScene`] is what a host importer consumes: the parsed mesh, the
//! material list, and lazily decoded textures. Each distinct [`TextureKey`]
//! is decoded at most once no matter how many materials reference it.

use crate::dump::{parse_dump, Rip};
use crate::error::RipResult;
use crate::material::{MaterialDescriptor, MaterialKey};
use crate::mesh::Mesh;
use crate::texture::{DecodedTexture, TextureCache, TextureKey};
use crate::toon::ToonRamp;
use log::warn;

/// Parsed dump plus texture caches.
#[derive(Debug)]
pub struct RipScene {
    rip: Rip,
    textures: TextureCache,
    toon_ramp: Option<ToonRamp>,
}

impl RipScene {
    pub fn new(rip: Rip) -> Self {
        Self {
            rip,
            textures: TextureCache::new(),
            toon_ramp: None,
        }
    }

    pub fn version(&self) -> i64 {
        self.rip.version
    }

    pub fn mesh(&self) -> &Mesh {
        &self.rip.mesh
    }

    pub fn rip(&self) -> &Rip {
        &self.rip
    }

    pub fn material_keys(&self) -> &[MaterialKey] {
        &self.rip.materials
    }

    /// Material descriptors in first-seen order.
    pub fn materials(&self) -> Vec<MaterialDescriptor> {
        self.rip
            .materials
            .iter()
            .map(|&key| MaterialDescriptor::from_key(key, self.rip.disp_cnt))
            .collect()
    }

    /// Distinct textures referenced by any material, in first-reference order.
    pub fn texture_keys(&self) -> Vec<TextureKey> {
        let mut keys: Vec<TextureKey> = Vec::new();
        for key in self.rip.materials.iter().filter_map(MaterialKey::texture) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Decoded texture for `key`, decoding on first request.
    ///
    /// `None` for untextured keys or when the dump had no `VRAM` record.
    pub fn texture(&mut self, key: &TextureKey) -> Option<&DecodedTexture> {
        let Some(vram) = self.rip.vram.as_ref() else {
            warn!("texture {} requested but the dump has no VRAM", key.file_stem());
            return None;
        };
        self.textures.get_or_decode(key, vram)
    }

    /// Number of textures decoded so far.
    pub fn decoded_texture_count(&self) -> usize {
        self.textures.len()
    }

    /// The 32x1 toon ramp, built on first request.
    pub fn toon_ramp(&mut self) -> &ToonRamp {
        let table = &self.rip.toon_table;
        self.toon_ramp.get_or_insert_with(|| ToonRamp::new(table))
    }

    pub fn into_rip(self) -> Rip {
        self.rip
    }
}

/// Decode dump bytes into an in-memory scene description.
pub fn decode_dump(dump: &[u8]) -> RipResult<RipScene> {
    parse_dump(dump).map(RipScene::new)
}
