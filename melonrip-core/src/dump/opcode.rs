// Record tags of the dump stream.
//
// Payload sizes are implied by the tag; there is no length prefix.

use crate::vram::VRAM_PAYLOAD_LEN;

/// Bytes per vertex in a polygon record: 3x i32 position, 3x i32 color,
/// 2x i16 texcoord.
pub const VERTEX_RECORD_LEN: usize = 4 * 3 + 4 * 3 + 2 * 2;

/// Number of entries in the toon table.
pub const TOON_TABLE_LEN: usize = 32;

/// A decoded 4-byte record tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Triangle,
    Quad,
    TexParam,
    TexPalette,
    PolygonAttr,
    Vram,
    DispCnt,
    ToonTable,
}

impl Opcode {
    pub const ALL: [Opcode; 8] = [
        Opcode::Triangle,
        Opcode::Quad,
        Opcode::TexParam,
        Opcode::TexPalette,
        Opcode::PolygonAttr,
        Opcode::Vram,
        Opcode::DispCnt,
        Opcode::ToonTable,
    ];

    /// Decode a tag, `None` for anything unrecognized.
    pub fn from_tag(tag: [u8; 4]) -> Option<Self> {
        match &tag {
            b"TRI " => Some(Self::Triangle),
            b"QUAD" => Some(Self::Quad),
            b"TPRM" => Some(Self::TexParam),
            b"TPLT" => Some(Self::TexPalette),
            b"PATR" => Some(Self::PolygonAttr),
            b"VRAM" => Some(Self::Vram),
            b"DISP" => Some(Self::DispCnt),
            b"TOON" => Some(Self::ToonTable),
            _ => None,
        }
    }

    pub fn tag(self) -> [u8; 4] {
        *match self {
            Self::Triangle => b"TRI ",
            Self::Quad => b"QUAD",
            Self::TexParam => b"TPRM",
            Self::TexPalette => b"TPLT",
            Self::PolygonAttr => b"PATR",
            Self::Vram => b"VRAM",
            Self::DispCnt => b"DISP",
            Self::ToonTable => b"TOON",
        }
    }

    /// Tag as text, for error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Triangle => "TRI",
            Self::Quad => "QUAD",
            Self::TexParam => "TPRM",
            Self::TexPalette => "TPLT",
            Self::PolygonAttr => "PATR",
            Self::Vram => "VRAM",
            Self::DispCnt => "DISP",
            Self::ToonTable => "TOON",
        }
    }

    /// Vertex count for polygon records.
    pub fn vertex_count(self) -> Option<usize> {
        match self {
            Self::Triangle => Some(3),
            Self::Quad => Some(4),
            _ => None,
        }
    }

    /// Fixed payload size following the tag.
    pub fn payload_len(self) -> usize {
        match self {
            Self::Triangle | Self::Quad => {
                self.vertex_count().unwrap_or(0) * VERTEX_RECORD_LEN
            }
            Self::TexParam | Self::TexPalette | Self::PolygonAttr | Self::DispCnt => 4,
            Self::Vram => VRAM_PAYLOAD_LEN,
            Self::ToonTable => TOON_TABLE_LEN * 2,
        }
    }
}
