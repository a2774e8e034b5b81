// Typed views over the DS 3D engine registers captured in a dump.
//
// Each view is a `Copy` newtype over the raw 32-bit value. The raw value is
// what gets hashed and compared for material/texture keys; the accessors only
// decode bit fields.

use crate::texture::TexelFormat;
use serde::{Deserialize, Serialize};

/// Bit-range extraction for packed register values.
pub trait BitField {
    /// Bits `lo..hi` (half-open), shifted down to bit 0.
    fn bits(self, lo: u32, hi: u32) -> u32;
}

impl BitField for u32 {
    #[inline]
    fn bits(self, lo: u32, hi: u32) -> u32 {
        debug_assert!(lo < hi && hi <= 32);
        let width = hi - lo;
        if width == 32 {
            self
        } else {
            (self >> lo) & ((1u32 << width) - 1)
        }
    }
}

/// TEXIMAGE_PARAM: texture address, size, wrapping and format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TexParam(pub u32);

impl TexParam {
    /// Byte offset of the texel data in texture memory.
    pub fn vram_offset(self) -> u32 {
        self.0.bits(0, 16) << 3
    }
    pub fn repeat_s(self) -> bool {
        self.0.bits(16, 17) != 0
    }
    pub fn repeat_t(self) -> bool {
        self.0.bits(17, 18) != 0
    }
    pub fn flip_s(self) -> bool {
        self.0.bits(18, 19) != 0
    }
    pub fn flip_t(self) -> bool {
        self.0.bits(19, 20) != 0
    }
    /// Width in texels, 8..=1024.
    pub fn width(self) -> u32 {
        8 << self.0.bits(20, 23)
    }
    /// Height in texels, 8..=1024.
    pub fn height(self) -> u32 {
        8 << self.0.bits(23, 26)
    }
    pub fn format(self) -> TexelFormat {
        TexelFormat::from_bits(self.0.bits(26, 29))
    }
    /// Palette entry 0 is transparent (paletted formats only).
    pub fn color0_transparent(self) -> bool {
        self.0.bits(29, 30) != 0
    }
}

/// Polygon rendering mode, bits 4-5 of POLYGON_ATTR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolygonMode {
    Modulate,
    Decal,
    /// Toon or highlight shading, selected globally by DISP3DCNT bit 1.
    ToonHighlight,
    /// Shadow volume; never rendered as geometry.
    Shadow,
}

impl PolygonMode {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Self::Modulate,
            1 => Self::Decal,
            2 => Self::ToonHighlight,
            _ => Self::Shadow,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Self::Modulate => 0,
            Self::Decal => 1,
            Self::ToonHighlight => 2,
            Self::Shadow => 3,
        }
    }
}

/// POLYGON_ATTR: mode, culling and polygon alpha.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonAttr(pub u32);

impl PolygonAttr {
    pub fn mode(self) -> PolygonMode {
        PolygonMode::from_bits(self.0.bits(4, 6))
    }
    pub fn is_shadow_volume(self) -> bool {
        self.mode() == PolygonMode::Shadow
    }
    pub fn render_back(self) -> bool {
        self.0.bits(6, 7) != 0
    }
    pub fn render_front(self) -> bool {
        self.0.bits(7, 8) != 0
    }
    /// Polygon alpha, 0..=31.
    pub fn alpha(self) -> u32 {
        self.0.bits(16, 21)
    }
}

/// DISP3DCNT: global 3D display control.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispCnt(pub u32);

impl DispCnt {
    /// Highlight shading instead of toon shading for toon/highlight polygons.
    pub fn highlight_shading(self) -> bool {
        self.0.bits(1, 2) != 0
    }
}
