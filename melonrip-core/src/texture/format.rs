// DS texel formats
use serde::{Deserialize, Serialize};

/// Texel encodings selectable by bits 26-28 of TEXIMAGE_PARAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TexelFormat {
    /// No texture bound.
    None,
    /// 3-bit alpha, 5-bit palette index.
    A3I5,
    /// 2 bits per texel, 4 palette colors.
    Palette4,
    /// 4 bits per texel, 16 palette colors.
    Palette16,
    /// 8 bits per texel, 256 palette colors.
    Palette256,
    /// 4x4 blocks of 2-bit indices with a per-block palette.
    Compressed4x4,
    /// 5-bit alpha, 3-bit palette index.
    A5I3,
    /// 16-bit direct color with 1-bit alpha.
    Direct,
}

impl TexelFormat {
    /// Decode the 3-bit format field. Every value is a valid format.
    pub fn from_bits(bits: u32) -> Self {
        match bits & 7 {
            0 => Self::None,
            1 => Self::A3I5,
            2 => Self::Palette4,
            3 => Self::Palette16,
            4 => Self::Palette256,
            5 => Self::Compressed4x4,
            6 => Self::A5I3,
            _ => Self::Direct,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Self::None => 0,
            Self::A3I5 => 1,
            Self::Palette4 => 2,
            Self::Palette16 => 3,
            Self::Palette256 => 4,
            Self::Compressed4x4 => 5,
            Self::A5I3 => 6,
            Self::Direct => 7,
        }
    }

    /// Whether the texel alpha comes from the color0-transparent flag.
    pub fn is_paletted(self) -> bool {
        matches!(self, Self::Palette4 | Self::Palette16 | Self::Palette256)
    }

    /// Whether texels carry more than on/off alpha.
    pub fn is_translucent(self) -> bool {
        matches!(self, Self::A3I5 | Self::A5I3)
    }
}
