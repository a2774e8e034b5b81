//! Toon/Highlight Color Resolution
//!
//! Polygons drawn in toon/highlight mode take their final color from a global
//! DISP3DCNT bit that may only appear at the end of the dump. Vertex colors
//! are therefore resolved in two phases:
//!
//! 1. While parsing, each vertex stores its raw 0..=31 channels and whether it
//!    was drawn in toon/highlight mode ([`RawVertexColor`])
//! 2. Once the stream is fully read, [`resolve_colors`] turns the raw colors
//!    into RGBA using the final DISP3DCNT
//!
//! In toon mode the vertex color becomes a grayscale value that, used as a UV,
//! picks the matching texel of the 32x1 [`ToonRamp`] image.

use crate::regs::DispCnt;
use crate::texture::decode::rgb555_channels;
use image::{ImageBuffer, Rgba, Rgba32FImage};

/// `TOON_INDEX_TABLE[n] / 255` used as a U coordinate selects texel `n` of a
/// 32-texel ramp.
pub const TOON_INDEX_TABLE: [u8; 32] = [
    24, 60, 78, 93, 105, 115, 124, 132, //
    140, 148, 155, 161, 167, 173, 179, 185, //
    190, 195, 200, 205, 209, 214, 218, 222, //
    226, 230, 234, 238, 242, 246, 249, 253,
];

/// Toon table used when the dump carries no `TOON` record.
pub const DEFAULT_TOON_TABLE: [u16; 32] = [0xFFFF; 32];

/// Vertex color as captured, before toon/highlight resolution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RawVertexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Drawn with polygon mode toon/highlight.
    pub toon_highlight: bool,
}

impl RawVertexColor {
    /// Undo the capture's color transform: `(c - 0xFFF) >> 12`, clamped to 0..=31.
    pub fn from_captured(rgb: [i32; 3], toon_highlight: bool) -> Self {
        let channel = |c: i32| ((c as i64 - 0xFFF) >> 12).clamp(0, 31) as u8;
        Self {
            r: channel(rgb[0]),
            g: channel(rgb[1]),
            b: channel(rgb[2]),
            toon_highlight,
        }
    }

    /// Final RGBA for this vertex.
    pub fn resolve(self, highlight_shading: bool) -> [f32; 4] {
        let norm = |c: u8| c as f32 / 31.0;
        if !self.toon_highlight {
            [norm(self.r), norm(self.g), norm(self.b), 1.0]
        } else if highlight_shading {
            // Red drives a grayscale highlight.
            let c = norm(self.r);
            [c, c, c, 1.0]
        } else {
            let c = TOON_INDEX_TABLE[self.r as usize] as f32 / 255.0;
            [c, c, c, 1.0]
        }
    }
}

/// Second phase: resolve every buffered vertex color with the final DISP3DCNT.
pub fn resolve_colors(raw: &[RawVertexColor], disp_cnt: DispCnt) -> Vec<[f32; 4]> {
    let highlight = disp_cnt.highlight_shading();
    raw.iter().map(|c| c.resolve(highlight)).collect()
}

/// The 32x1 toon ramp image built from the toon table.
#[derive(Debug, Clone, PartialEq)]
pub struct ToonRamp {
    pub image: Rgba32FImage,
}

impl ToonRamp {
    pub const WIDTH: u32 = 32;

    pub fn new(table: &[u16; 32]) -> Self {
        let image = ImageBuffer::from_fn(Self::WIDTH, 1, |x, _| {
            let [r, g, b] = rgb555_channels(table[x as usize]);
            Rgba([r as f32 / 31.0, g as f32 / 31.0, b as f32 / 31.0, 1.0])
        });
        Self { image }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_correction() {
        let c = RawVertexColor::from_captured([0xFFF, 0x1FFF, 0x1FFFF], false);
        assert_eq!((c.r, c.g, c.b), (0, 1, 31));
        let c = RawVertexColor::from_captured([0x2FFF, 0x2FFE, 0x3000], false);
        assert_eq!((c.r, c.g, c.b), (2, 1, 2));
    }

    #[test]
    fn bias_correction_clamps() {
        let c = RawVertexColor::from_captured([0, i32::MIN, i32::MAX], false);
        assert_eq!((c.r, c.g, c.b), (0, 0, 31));
    }

    #[test]
    fn normal_vertices_ignore_disp_cnt() {
        let c = RawVertexColor {
            r: 31,
            g: 0,
            b: 31,
            toon_highlight: false,
        };
        assert_eq!(c.resolve(false), [1.0, 0.0, 1.0, 1.0]);
        assert_eq!(c.resolve(true), [1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn highlight_uses_red_as_gray() {
        let c = RawVertexColor {
            r: 31,
            g: 5,
            b: 0,
            toon_highlight: true,
        };
        assert_eq!(c.resolve(true), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn toon_indexes_table() {
        let lo = RawVertexColor {
            r: 0,
            toon_highlight: true,
            ..Default::default()
        };
        let hi = RawVertexColor {
            r: 31,
            toon_highlight: true,
            ..Default::default()
        };
        let lo = lo.resolve(false);
        let hi = hi.resolve(false);
        assert_eq!(lo, [24.0 / 255.0, 24.0 / 255.0, 24.0 / 255.0, 1.0]);
        assert_eq!(hi[0], 253.0 / 255.0);
    }

    #[test]
    fn resolve_uses_final_disp_cnt() {
        let raw = [
            RawVertexColor {
                r: 10,
                toon_highlight: true,
                ..Default::default()
            },
            RawVertexColor {
                r: 10,
                g: 20,
                ..Default::default()
            },
        ];
        let toon = resolve_colors(&raw, DispCnt(0));
        let highlight = resolve_colors(&raw, DispCnt(2));
        assert_eq!(toon[0][0], TOON_INDEX_TABLE[10] as f32 / 255.0);
        assert_eq!(highlight[0][0], 10.0 / 31.0);
        assert_eq!(toon[1], highlight[1]);
    }

    #[test]
    fn ramp_from_table() {
        let mut table = DEFAULT_TOON_TABLE;
        table[0] = 0x001F;
        table[31] = 0x7C00;
        let ramp = ToonRamp::new(&table);
        assert_eq!(ramp.image.dimensions(), (32, 1));
        assert_eq!(ramp.image.get_pixel(0, 0).0, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(ramp.image.get_pixel(1, 0).0, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(ramp.image.get_pixel(31, 0).0, [0.0, 0.0, 1.0, 1.0]);
    }
}
