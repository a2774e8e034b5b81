//! Texel Decoding
//!
//! Decodes one texture from flattened VRAM into a float RGBA image.
//!
//! # Algorithm
//! 1. Walk texture memory from the texture's base address in source order,
//!    producing one [`Texel`] (15-bit color + 5-bit alpha) per pixel
//! 2. Emit rows bottom-up so the image is right-side-up for renderers whose
//!    texture origin is the bottom-left corner
//! 3. Normalize color and alpha from 0..=31 to 0.0..=1.0
//!
//! Palette arithmetic wraps in 16-bit palette-entry space and texel reads wrap
//! in texture memory, matching the hardware.

use super::cache::TextureKey;
use super::format::TexelFormat;
use crate::vram::Vram;
use image::{ImageBuffer, Rgba, Rgba32FImage};

const MAX_ALPHA: u8 = 31;

/// A texel before normalization: BGR555 color plus 0..=31 alpha.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Texel {
    pub color: u16,
    pub alpha: u8,
}

impl Texel {
    pub const TRANSPARENT: Texel = Texel { color: 0, alpha: 0 };

    #[inline]
    pub fn new(color: u16, alpha: u8) -> Self {
        Self { color, alpha }
    }

    #[inline]
    pub fn opaque(color: u16) -> Self {
        Self::new(color, MAX_ALPHA)
    }

    /// Normalized RGBA.
    #[inline]
    pub fn to_rgba(self) -> Rgba<f32> {
        let [r, g, b] = rgb555_channels(self.color);
        Rgba([
            r as f32 / 31.0,
            g as f32 / 31.0,
            b as f32 / 31.0,
            self.alpha as f32 / 31.0,
        ])
    }
}

/// Split a 5/5/5 color into (r, g, b): bits 0-4, 5-9, 10-14.
#[inline]
pub fn rgb555_channels(color: u16) -> [u16; 3] {
    [color & 0x1F, (color >> 5) & 0x1F, (color >> 10) & 0x1F]
}

/// A decoded texture.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTexture {
    /// Row-major RGBA, first row is the bottom of the console image.
    pub image: Rgba32FImage,
    /// Every texel has full alpha.
    pub opaque: bool,
}

impl DecodedTexture {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Flat RGBA float samples.
    pub fn pixels(&self) -> &[f32] {
        self.image.as_raw()
    }

    /// Assemble from texels in console scan order (top row first).
    pub fn from_texels(width: u32, height: u32, texels: &[Texel]) -> Self {
        debug_assert_eq!(texels.len(), (width * height) as usize);
        let opaque = texels.iter().all(|t| t.alpha == MAX_ALPHA);
        let image = ImageBuffer::from_fn(width, height, |x, y| {
            let src_row = height - 1 - y;
            texels[(src_row * width + x) as usize].to_rgba()
        });
        Self { image, opaque }
    }
}

/// Decode the texture described by `key`. `None` for [`TexelFormat::None`].
pub fn decode_texture(vram: &Vram, key: &TextureKey) -> Option<DecodedTexture> {
    let texels = match key.format {
        TexelFormat::None => return None,
        TexelFormat::A3I5 => decode_a3i5(vram, key),
        TexelFormat::A5I3 => decode_a5i3(vram, key),
        TexelFormat::Palette4 => decode_paletted(vram, key, 2),
        TexelFormat::Palette16 => decode_paletted(vram, key, 4),
        TexelFormat::Palette256 => decode_paletted(vram, key, 8),
        TexelFormat::Compressed4x4 => super::compressed::decode_compressed(vram, key),
        TexelFormat::Direct => decode_direct(vram, key),
    };
    Some(DecodedTexture::from_texels(key.width, key.height, &texels))
}

#[inline]
fn texel_count(key: &TextureKey) -> u32 {
    key.width * key.height
}

fn decode_a3i5(vram: &Vram, key: &TextureKey) -> Vec<Texel> {
    let pal_base = key.palette_base << 3;
    (0..texel_count(key))
        .map(|i| {
            let pixel = vram.texture_u8(key.vram_offset.wrapping_add(i));
            let color = vram.palette_color(pal_base.wrapping_add((pixel & 0x1F) as u32));
            // 3-bit alpha expanded to 5 bits: a*4 + a/2.
            let alpha = ((pixel >> 3) & 0x1C) + (pixel >> 6);
            Texel::new(color, alpha)
        })
        .collect()
}

fn decode_a5i3(vram: &Vram, key: &TextureKey) -> Vec<Texel> {
    let pal_base = key.palette_base << 3;
    (0..texel_count(key))
        .map(|i| {
            let pixel = vram.texture_u8(key.vram_offset.wrapping_add(i));
            let color = vram.palette_color(pal_base.wrapping_add((pixel & 0x7) as u32));
            Texel::new(color, pixel >> 3)
        })
        .collect()
}

/// 2, 4 or 8 bit palette indices, packed low bits first.
fn decode_paletted(vram: &Vram, key: &TextureKey, bits_per_texel: u32) -> Vec<Texel> {
    let per_byte = 8 / bits_per_texel;
    let index_mask = (1u32 << bits_per_texel) - 1;
    // 4-color palettes are addressed in 4-entry units, the rest in 8-entry units.
    let pal_base = if bits_per_texel == 2 {
        key.palette_base << 2
    } else {
        key.palette_base << 3
    };
    let alpha0 = if key.color0_transparent { 0 } else { MAX_ALPHA };

    let byte_count = texel_count(key) / per_byte;
    let mut texels = Vec::with_capacity(texel_count(key) as usize);
    for i in 0..byte_count {
        let packed = vram.texture_u8(key.vram_offset.wrapping_add(i)) as u32;
        for slot in 0..per_byte {
            let index = (packed >> (slot * bits_per_texel)) & index_mask;
            let color = vram.palette_color(pal_base.wrapping_add(index));
            let alpha = if index == 0 { alpha0 } else { MAX_ALPHA };
            texels.push(Texel::new(color, alpha));
        }
    }
    texels
}

fn decode_direct(vram: &Vram, key: &TextureKey) -> Vec<Texel> {
    (0..texel_count(key))
        .map(|i| {
            let pixel = vram.texture_u16(key.vram_offset.wrapping_add(i * 2));
            let alpha = if pixel & 0x8000 != 0 { MAX_ALPHA } else { 0 };
            Texel::new(pixel, alpha)
        })
        .collect()
}
