//! Test Utilities
//!
//! Builders for synthetic MelonRipper dumps.

#![allow(dead_code)]

use melonrip_core::dump::magic_for_version;
use melonrip_core::vram::{
    PALETTE_BANK_COUNT, PALETTE_BANK_SIZE, TEXTURE_BANK_COUNT, TEXTURE_BANK_SIZE,
};

/// One vertex as it appears in a `TRI `/`QUAD` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestVertex {
    /// 20.12 fixed point, console axes.
    pub pos: [i32; 3],
    /// Captured color words (already biased).
    pub color: [i32; 3],
    /// 12.4 fixed point texels.
    pub uv: [i16; 2],
}

/// Vertex with a 0..=31 color encoded the way the capture stores it.
pub fn vertex(pos: [i32; 3], rgb: [i32; 3], uv: [i16; 2]) -> TestVertex {
    TestVertex {
        pos,
        color: rgb.map(captured_color),
        uv,
    }
}

/// Inverse of the capture's color transform for a 0..=31 channel.
pub fn captured_color(channel: i32) -> i32 {
    (channel << 12) + 0xFFF
}

/// Three white vertices at distinct positions.
pub fn white_triangle() -> [TestVertex; 3] {
    [
        vertex([0, 0, 0], [31, 31, 31], [0, 0]),
        vertex([4096, 0, 0], [31, 31, 31], [128, 0]),
        vertex([0, 4096, 0], [31, 31, 31], [0, 128]),
    ]
}

/// Incrementally builds a dump.
#[derive(Debug, Clone)]
pub struct DumpBuilder {
    bytes: Vec<u8>,
}

impl DumpBuilder {
    pub fn new(version: i64) -> Self {
        Self {
            bytes: magic_for_version(version).to_vec(),
        }
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    fn u32_record(self, tag: &[u8; 4], value: u32) -> Self {
        self.raw(tag).raw(&value.to_le_bytes())
    }

    pub fn tex_param(self, value: u32) -> Self {
        self.u32_record(b"TPRM", value)
    }

    pub fn tex_pal(self, value: u32) -> Self {
        self.u32_record(b"TPLT", value)
    }

    pub fn polygon_attr(self, value: u32) -> Self {
        self.u32_record(b"PATR", value)
    }

    pub fn disp_cnt(self, value: u32) -> Self {
        self.u32_record(b"DISP", value)
    }

    pub fn toon(mut self, table: &[u16; 32]) -> Self {
        self.bytes.extend_from_slice(b"TOON");
        for entry in table {
            self.bytes.extend_from_slice(&entry.to_le_bytes());
        }
        self
    }

    fn polygon(mut self, tag: &[u8; 4], verts: &[TestVertex]) -> Self {
        self.bytes.extend_from_slice(tag);
        for v in verts {
            for p in v.pos {
                self.bytes.extend_from_slice(&p.to_le_bytes());
            }
            for c in v.color {
                self.bytes.extend_from_slice(&c.to_le_bytes());
            }
            for t in v.uv {
                self.bytes.extend_from_slice(&t.to_le_bytes());
            }
        }
        self
    }

    pub fn tri(self, verts: [TestVertex; 3]) -> Self {
        self.polygon(b"TRI ", &verts)
    }

    pub fn quad(self, verts: [TestVertex; 4]) -> Self {
        self.polygon(b"QUAD", &verts)
    }

    /// `VRAM` record with bank A mapped to texture window 0 and the first
    /// quarter of bank E mapped to palette window 0.
    pub fn vram(mut self, texture: &[u8], palette: &[u16]) -> Self {
        assert!(texture.len() <= TEXTURE_BANK_SIZE);
        assert!(palette.len() * 2 <= PALETTE_BANK_SIZE);

        self.bytes.extend_from_slice(b"VRAM");
        let texture_map = [1u32 << 0, 0, 0, 0];
        let palette_map = [1u32 << 4, 0, 0, 0, 0, 0, 0, 0];
        for mask in texture_map.iter().chain(palette_map.iter()) {
            self.bytes.extend_from_slice(&mask.to_le_bytes());
        }

        let mut bank_a = texture.to_vec();
        bank_a.resize(TEXTURE_BANK_SIZE, 0);
        self.bytes.extend_from_slice(&bank_a);
        self.bytes
            .resize(self.bytes.len() + (TEXTURE_BANK_COUNT - 1) * TEXTURE_BANK_SIZE, 0);

        let mut bank_e0: Vec<u8> = palette.iter().flat_map(|c| c.to_le_bytes()).collect();
        bank_e0.resize(PALETTE_BANK_SIZE, 0);
        self.bytes.extend_from_slice(&bank_e0);
        self.bytes
            .resize(self.bytes.len() + (PALETTE_BANK_COUNT - 1) * PALETTE_BANK_SIZE, 0);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
