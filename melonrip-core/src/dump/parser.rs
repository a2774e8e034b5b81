//! Dump Parser
//!
//! This module replays the command log of a MelonRipper dump into flat mesh
//! buffers, a material list, and flattened VRAM.
//!
//! # Dump Format
//! - **Magic**: 24 bytes, NUL-padded `melon ripper v<N>`, 1 <= N <= 2
//! - **Records**: 4-byte ASCII tag followed by a payload whose size is
//!   implied by the tag (see [`Opcode::payload_len`])
//!
//! # Algorithm
//! 1. Check the magic and version
//! 2. Walk the records once, left to right, updating [`RegisterState`] and
//!    appending vertices/faces for every polygon record
//! 3. Resolve vertex colors once the final DISP3DCNT is known
//!
//! Any error aborts the whole parse; no partial output is returned.

use super::magic::{check_magic, MAGIC_LEN};
use super::opcode::{Opcode, TOON_TABLE_LEN};
use super::reader::DumpReader;
use crate::error::{RipError, RipResult};
use crate::material::{MaterialKey, MaterialTable};
use crate::mesh::{FaceIndices, Mesh};
use crate::regs::{DispCnt, PolygonAttr, PolygonMode, TexParam};
use crate::toon::{resolve_colors, RawVertexColor, DEFAULT_TOON_TABLE};
use crate::vram::{Vram, VramBanks};
use log::{debug, info, trace, warn};

/// Scale of 20.12 fixed-point positions.
const POSITION_SCALE: f32 = 1.0 / 4096.0;
/// Texcoords are 12.4 fixed-point texels.
const TEXCOORD_SCALE: f32 = 1.0 / 16.0;

/// GPU registers as last written by the stream. Each value applies to every
/// polygon drawn until the next write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterState {
    pub tex_param: TexParam,
    pub tex_pal: u32,
    pub polygon_attr: PolygonAttr,
    pub disp_cnt: DispCnt,
    pub toon_table: [u16; TOON_TABLE_LEN],
    /// Width of the current texture, for texcoord normalization.
    pub texture_width: u32,
    /// Height of the current texture, for texcoord normalization.
    pub texture_height: u32,
}

impl Default for RegisterState {
    fn default() -> Self {
        Self {
            tex_param: TexParam(0),
            tex_pal: 0,
            polygon_attr: PolygonAttr(0),
            disp_cnt: DispCnt(0),
            toon_table: DEFAULT_TOON_TABLE,
            texture_width: 8,
            texture_height: 8,
        }
    }
}

impl RegisterState {
    pub fn set_tex_param(&mut self, tex_param: TexParam) {
        self.tex_param = tex_param;
        self.texture_width = tex_param.width();
        self.texture_height = tex_param.height();
    }

    pub fn material_key(&self) -> MaterialKey {
        MaterialKey::new(self.tex_param, self.tex_pal, self.polygon_attr)
    }
}

/// Everything a successful parse produces.
#[derive(Debug, Clone)]
pub struct Rip {
    pub version: i64,
    pub mesh: Mesh,
    /// Distinct materials, in first-seen order.
    pub materials: Vec<MaterialKey>,
    /// Flattened VRAM from the last `VRAM` record, if any.
    pub vram: Option<Vram>,
    /// Final display control register.
    pub disp_cnt: DispCnt,
    /// Final toon table.
    pub toon_table: [u16; TOON_TABLE_LEN],
    /// Polygons dropped because they were shadow volumes.
    pub skipped_shadow_polygons: usize,
}

/// Single-pass state machine over a dump.
pub struct DumpParser<'a> {
    reader: DumpReader<'a>,
    version: i64,
    regs: RegisterState,

    positions: Vec<[f32; 3]>,
    raw_colors: Vec<RawVertexColor>,
    uvs: Vec<[f32; 2]>,
    faces: Vec<FaceIndices>,
    face_materials: Vec<u32>,
    materials: MaterialTable,

    vram: Option<Vram>,
    skipped_shadow_polygons: usize,
}

impl<'a> DumpParser<'a> {
    /// Check the header and position the cursor on the first record.
    pub fn new(dump: &'a [u8]) -> RipResult<Self> {
        let version = check_magic(dump)?;
        Ok(Self {
            reader: DumpReader::at(dump, MAGIC_LEN),
            version,
            regs: RegisterState::default(),
            positions: Vec::new(),
            raw_colors: Vec::new(),
            uvs: Vec::new(),
            faces: Vec::new(),
            face_materials: Vec::new(),
            materials: MaterialTable::new(),
            vram: None,
            skipped_shadow_polygons: 0,
        })
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Current register state.
    pub fn registers(&self) -> &RegisterState {
        &self.regs
    }

    /// Consume the whole stream.
    #[inline(never)]
    pub fn parse(mut self) -> RipResult<Rip> {
        while !self.reader.is_empty() {
            self.step()?;
        }
        Ok(self.finish())
    }

    /// Read and apply one record.
    pub fn step(&mut self) -> RipResult<Opcode> {
        let offset = self.reader.position();
        let tag = self.reader.read_tag()?;
        let op = Opcode::from_tag(tag).ok_or(RipError::UnknownOpcode { tag, offset })?;
        trace!("0x{:08X}: {}", offset, op.name());

        let mut payload = self.reader.sub(op.name(), op.payload_len())?;

        match op {
            Opcode::Triangle | Opcode::Quad => {
                let nverts = op.vertex_count().unwrap_or(3);
                self.polygon(&mut payload, op.name(), nverts)?;
            }
            Opcode::TexParam => {
                let tex_param = TexParam(payload.read_u32(op.name())?);
                self.regs.set_tex_param(tex_param);
            }
            Opcode::TexPalette => {
                self.regs.tex_pal = payload.read_u32(op.name())?;
            }
            Opcode::PolygonAttr => {
                self.regs.polygon_attr = PolygonAttr(payload.read_u32(op.name())?);
            }
            Opcode::Vram => {
                let banks = VramBanks::read(&mut payload)?;
                if self.vram.is_some() {
                    warn!("dump has more than one VRAM record; keeping the last");
                }
                debug!(
                    "mapping VRAM: texture masks {:08X?}, palette masks {:08X?}",
                    banks.texture_map, banks.palette_map
                );
                self.vram = Some(Vram::map(&banks));
            }
            Opcode::DispCnt => {
                self.regs.disp_cnt = DispCnt(payload.read_u32(op.name())?);
            }
            Opcode::ToonTable => {
                for entry in self.regs.toon_table.iter_mut() {
                    *entry = payload.read_u16(op.name())?;
                }
            }
        }

        Ok(op)
    }

    fn polygon(
        &mut self,
        payload: &mut DumpReader<'_>,
        record: &'static str,
        nverts: usize,
    ) -> RipResult<()> {
        // Shadow volumes have no visible surface.
        if self.regs.polygon_attr.is_shadow_volume() {
            self.skipped_shadow_polygons += 1;
            return Ok(());
        }

        let toon_highlight = self.regs.polygon_attr.mode() == PolygonMode::ToonHighlight;
        let width = self.regs.texture_width as f32;
        let height = self.regs.texture_height as f32;
        let first = self.positions.len() as u32;

        for _ in 0..nverts {
            let x = payload.read_i32(record)? as f32 * POSITION_SCALE;
            let y = payload.read_i32(record)? as f32 * POSITION_SCALE;
            let z = payload.read_i32(record)? as f32 * POSITION_SCALE;
            // Y-up to Z-up.
            self.positions.push([x, -z, y]);

            let r = payload.read_i32(record)?;
            let g = payload.read_i32(record)?;
            let b = payload.read_i32(record)?;
            self.raw_colors
                .push(RawVertexColor::from_captured([r, g, b], toon_highlight));

            let s = payload.read_i16(record)? as f32;
            let t = payload.read_i16(record)? as f32;
            // Textures are stored flipped, so flip T to match.
            self.uvs
                .push([s * TEXCOORD_SCALE / width, 1.0 - t * TEXCOORD_SCALE / height]);
        }

        let material = self.materials.intern(self.regs.material_key());
        self.faces.push((first..first + nverts as u32).collect());
        self.face_materials.push(material);
        Ok(())
    }

    fn finish(self) -> Rip {
        let colors = resolve_colors(&self.raw_colors, self.regs.disp_cnt);

        if self.skipped_shadow_polygons > 0 {
            debug!("skipped {} shadow volume polygons", self.skipped_shadow_polygons);
        }
        if self.vram.is_none() && !self.faces.is_empty() {
            warn!("dump has geometry but no VRAM record; textures will be unavailable");
        }
        info!(
            "parsed MelonRipper v{} dump: {} vertices, {} faces, {} materials",
            self.version,
            self.positions.len(),
            self.faces.len(),
            self.materials.len()
        );

        Rip {
            version: self.version,
            mesh: Mesh {
                positions: self.positions,
                colors,
                uvs: self.uvs,
                faces: self.faces,
                face_materials: self.face_materials,
            },
            materials: self.materials.into_keys(),
            vram: self.vram,
            disp_cnt: self.regs.disp_cnt,
            toon_table: self.regs.toon_table,
            skipped_shadow_polygons: self.skipped_shadow_polygons,
        }
    }
}

/// Parse a complete dump.
pub fn parse_dump(dump: &[u8]) -> RipResult<Rip> {
    DumpParser::new(dump)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::magic::magic_for_version;

    fn dump(records: &[&[u8]]) -> Vec<u8> {
        let mut out = magic_for_version(2).to_vec();
        for r in records {
            out.extend_from_slice(r);
        }
        out
    }

    fn u32_record(tag: &[u8; 4], value: u32) -> Vec<u8> {
        let mut out = tag.to_vec();
        out.extend_from_slice(&value.to_le_bytes());
        out
    }

    #[test]
    fn register_defaults() {
        let regs = RegisterState::default();
        assert_eq!(regs.texture_width, 8);
        assert_eq!(regs.texture_height, 8);
        assert_eq!(regs.toon_table, [0xFFFF; 32]);
        assert_eq!(regs.material_key(), MaterialKey::default());
    }

    #[test]
    fn tex_param_updates_texture_size() {
        let data = dump(&[&u32_record(b"TPRM", (2 << 20) | (5 << 23))]);
        let mut parser = DumpParser::new(&data).unwrap();
        assert_eq!(parser.step().unwrap(), Opcode::TexParam);
        assert_eq!(parser.registers().texture_width, 32);
        assert_eq!(parser.registers().texture_height, 256);
    }

    #[test]
    fn registers_are_last_write_wins() {
        let data = dump(&[
            &u32_record(b"TPLT", 1),
            &u32_record(b"PATR", 0x10),
            &u32_record(b"TPLT", 7),
            &u32_record(b"DISP", 2),
        ]);
        let mut parser = DumpParser::new(&data).unwrap();
        for _ in 0..4 {
            parser.step().unwrap();
        }
        assert_eq!(parser.registers().tex_pal, 7);
        assert_eq!(parser.registers().polygon_attr, PolygonAttr(0x10));
        assert_eq!(parser.registers().disp_cnt, DispCnt(2));
    }

    #[test]
    fn toon_record_fills_table() {
        let mut record = b"TOON".to_vec();
        for i in 0..32u16 {
            record.extend_from_slice(&i.to_le_bytes());
        }
        let rip = parse_dump(&dump(&[&record])).unwrap();
        assert_eq!(rip.toon_table[0], 0);
        assert_eq!(rip.toon_table[31], 31);
    }

    #[test]
    fn empty_stream_is_valid() {
        let rip = parse_dump(&dump(&[])).unwrap();
        assert_eq!(rip.version, 2);
        assert!(rip.mesh.is_empty());
        assert!(rip.materials.is_empty());
        assert!(rip.vram.is_none());
    }

    #[test]
    fn partial_tag_is_truncated() {
        let data = dump(&[b"TP"]);
        assert!(matches!(
            parse_dump(&data),
            Err(RipError::TruncatedRecord { record: "opcode", offset: 24, .. })
        ));
    }

    #[test]
    fn unknown_tag_reports_offset() {
        let data = dump(&[&u32_record(b"TPLT", 0), b"NOPE"]);
        assert_eq!(
            parse_dump(&data).unwrap_err(),
            RipError::UnknownOpcode {
                tag: *b"NOPE",
                offset: 32
            }
        );
    }
}
