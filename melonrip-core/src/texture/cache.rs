// Texture cache
use super::decode::{decode_texture, DecodedTexture};
use super::format::TexelFormat;
use crate::regs::TexParam;
use crate::vram::Vram;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything a decoded texture's pixels depend on.
///
/// Two register pairs that differ only in bits the decoder ignores (wrap
/// flags, or the color0 flag on non-paletted formats) share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureKey {
    pub vram_offset: u32,
    pub width: u32,
    pub height: u32,
    pub color0_transparent: bool,
    pub format: TexelFormat,
    pub palette_base: u32,
}

impl TextureKey {
    pub fn new(tex_param: TexParam, tex_pal: u32) -> Self {
        let format = tex_param.format();
        Self {
            vram_offset: tex_param.vram_offset(),
            width: tex_param.width(),
            height: tex_param.height(),
            color0_transparent: format.is_paletted() && tex_param.color0_transparent(),
            format,
            palette_base: tex_pal,
        }
    }

    /// Stable file-name-friendly identifier.
    pub fn file_stem(&self) -> String {
        format!(
            "tex_{:05X}_{}x{}_f{}_p{:04X}{}",
            self.vram_offset,
            self.width,
            self.height,
            self.format.bits(),
            self.palette_base,
            if self.color0_transparent { "_a0" } else { "" }
        )
    }
}

/// Decoded textures, each decoded at most once per key.
#[derive(Debug, Default)]
pub struct TextureCache {
    cache: HashMap<TextureKey, Option<DecodedTexture>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached texture for `key`, decoding it on first request.
    ///
    /// `None` when the key's format is [`TexelFormat::None`].
    pub fn get_or_decode(&mut self, key: &TextureKey, vram: &Vram) -> Option<&DecodedTexture> {
        self.cache
            .entry(*key)
            .or_insert_with(|| {
                debug!(
                    "decoding {:?} texture {}x{} at 0x{:05X}, palette 0x{:04X}",
                    key.format, key.width, key.height, key.vram_offset, key.palette_base
                );
                decode_texture(vram, key)
            })
            .as_ref()
    }

    pub fn get(&self, key: &TextureKey) -> Option<&DecodedTexture> {
        self.cache.get(key).and_then(Option::as_ref)
    }

    /// Number of distinct keys decoded so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_wrap_bits() {
        let base = TexParam((7 << 26) | 0x40);
        let wrapped = TexParam(base.0 | (0xF << 16));
        assert_eq!(TextureKey::new(base, 3), TextureKey::new(wrapped, 3));
    }

    #[test]
    fn key_ignores_color0_flag_unless_paletted() {
        let direct = TexParam(7 << 26);
        let direct_a0 = TexParam(direct.0 | (1 << 29));
        assert_eq!(TextureKey::new(direct, 0), TextureKey::new(direct_a0, 0));

        let pal16 = TexParam(3 << 26);
        let pal16_a0 = TexParam(pal16.0 | (1 << 29));
        assert_ne!(TextureKey::new(pal16, 0), TextureKey::new(pal16_a0, 0));
    }

    #[test]
    fn key_tracks_palette_and_size() {
        let p = TexParam(2 << 26);
        assert_ne!(TextureKey::new(p, 0), TextureKey::new(p, 1));
        assert_ne!(
            TextureKey::new(p, 0),
            TextureKey::new(TexParam(p.0 | (1 << 20)), 0)
        );
    }

    #[test]
    fn decodes_once_per_key() {
        let vram = Vram::from_raw(&[0xFF; 128], &[]);
        let mut cache = TextureCache::new();
        let key = TextureKey::new(TexParam(7 << 26), 0);

        let first = cache.get_or_decode(&key, &vram).cloned().unwrap();
        let second = cache.get_or_decode(&key, &vram).cloned().unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        let other = TextureKey::new(TexParam((7 << 26) | 1), 0);
        cache.get_or_decode(&other, &vram);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn untextured_key_yields_none() {
        let vram = Vram::from_raw(&[], &[]);
        let mut cache = TextureCache::new();
        let key = TextureKey::new(TexParam(0), 0);
        assert!(cache.get_or_decode(&key, &vram).is_none());
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn file_stem_is_descriptive() {
        let key = TextureKey::new(TexParam((3 << 26) | (1 << 29) | (2 << 20) | 0x10), 0x12);
        assert_eq!(key.file_stem(), "tex_00080_32x8_f3_p0012_a0");
    }
}
