//! Video RAM Bank Mapping
//!
//! The DS has nine physical VRAM banks (A-I) that software maps into logical
//! roles. A dump stores the raw contents of the texture-capable banks A-D
//! (128KiB each), bank E split into four 16KiB quarters, and banks F-G
//! (16KiB each), together with the bank-selection masks for every 128KiB
//! texture window and every 16KiB palette window.
//!
//! [`Vram::map`] flattens those banks into the two address spaces the 3D
//! engine reads from:
//! - **Texture memory**: 4 windows x 128KiB = 512KiB of bytes
//! - **Palette memory**: 8 windows x 16KiB = 128KiB, held as 64Ki `u16`s
//!
//! All reads wrap around the flattened space with a bitmask, the same way the
//! hardware address lines do. Out-of-range reads never fail.

use crate::dump::DumpReader;
use crate::error::RipResult;
use log::debug;

pub const TEXTURE_BANK_SIZE: usize = 128 << 10;
pub const PALETTE_BANK_SIZE: usize = 16 << 10;
pub const TEXTURE_BANK_COUNT: usize = 4;
pub const PALETTE_BANK_COUNT: usize = 6;
pub const TEXTURE_WINDOWS: usize = 4;
pub const PALETTE_WINDOWS: usize = 8;

/// Byte length of a `VRAM` record payload: masks then raw bank contents.
pub const VRAM_PAYLOAD_LEN: usize = TEXTURE_WINDOWS * 4
    + PALETTE_WINDOWS * 4
    + TEXTURE_BANK_COUNT * TEXTURE_BANK_SIZE
    + PALETTE_BANK_COUNT * PALETTE_BANK_SIZE;

/// Flattened texture memory size in bytes.
pub const TEXTURE_MEMORY_SIZE: usize = TEXTURE_WINDOWS * TEXTURE_BANK_SIZE;
/// Flattened palette memory size in 16-bit entries.
pub const PALETTE_ENTRY_COUNT: usize = PALETTE_WINDOWS * PALETTE_BANK_SIZE / 2;

const TEXTURE_ADDR_MASK: u32 = (TEXTURE_MEMORY_SIZE - 1) as u32;
const PALETTE_INDEX_MASK: u32 = (PALETTE_ENTRY_COUNT - 1) as u32;

/// Raw banks and mapping masks of one `VRAM` record, borrowed from the dump.
#[derive(Debug, Clone)]
pub struct VramBanks<'a> {
    pub texture_map: [u32; TEXTURE_WINDOWS],
    pub palette_map: [u32; PALETTE_WINDOWS],
    /// Banks A-D.
    pub texture_banks: [&'a [u8]; TEXTURE_BANK_COUNT],
    /// Bank E quarters 0-3, then banks F and G.
    pub palette_banks: [&'a [u8]; PALETTE_BANK_COUNT],
}

impl<'a> VramBanks<'a> {
    /// Split a `VRAM` payload of exactly [`VRAM_PAYLOAD_LEN`] bytes.
    pub fn read(reader: &mut DumpReader<'a>) -> RipResult<Self> {
        let mut texture_map = [0u32; TEXTURE_WINDOWS];
        for mask in texture_map.iter_mut() {
            *mask = reader.read_u32("VRAM")?;
        }

        let mut palette_map = [0u32; PALETTE_WINDOWS];
        for mask in palette_map.iter_mut() {
            *mask = reader.read_u32("VRAM")?;
        }

        let mut texture_banks: [&'a [u8]; TEXTURE_BANK_COUNT] = [&[]; TEXTURE_BANK_COUNT];
        for bank in texture_banks.iter_mut() {
            *bank = reader.take("VRAM", TEXTURE_BANK_SIZE)?;
        }

        let mut palette_banks: [&'a [u8]; PALETTE_BANK_COUNT] = [&[]; PALETTE_BANK_COUNT];
        for bank in palette_banks.iter_mut() {
            *bank = reader.take("VRAM", PALETTE_BANK_SIZE)?;
        }

        Ok(Self {
            texture_map,
            palette_map,
            texture_banks,
            palette_banks,
        })
    }

    /// Bank backing texture window `window`, if any.
    ///
    /// The lowest set bit among 0-3 wins (bit k selects bank A+k).
    fn texture_window_bank(&self, window: usize) -> Option<&'a [u8]> {
        let mask = self.texture_map[window];
        (0..TEXTURE_BANK_COUNT)
            .find(|&bank| mask & (1 << bank) != 0)
            .map(|bank| self.texture_banks[bank])
    }

    /// Bank backing palette window `window`, if any.
    ///
    /// Bit 4 selects the matching quarter of bank E, bit 5 bank F, bit 6 bank G.
    fn palette_window_bank(&self, window: usize) -> Option<&'a [u8]> {
        let mask = self.palette_map[window];
        if mask & (1 << 4) != 0 {
            Some(self.palette_banks[window & 3])
        } else if mask & (1 << 5) != 0 {
            Some(self.palette_banks[4])
        } else if mask & (1 << 6) != 0 {
            Some(self.palette_banks[5])
        } else {
            None
        }
    }
}

/// Flattened texture and palette memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Vram {
    texture: Vec<u8>,
    palette: Vec<u16>,
}

impl std::fmt::Debug for Vram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vram")
            .field("texture_bytes", &self.texture.len())
            .field("palette_entries", &self.palette.len())
            .finish()
    }
}

impl Vram {
    /// Lay out banks into the two flat address spaces. Unmapped windows read
    /// as zero.
    pub fn map(banks: &VramBanks<'_>) -> Self {
        let mut texture = vec![0u8; TEXTURE_MEMORY_SIZE];
        for (window, chunk) in texture.chunks_exact_mut(TEXTURE_BANK_SIZE).enumerate() {
            match banks.texture_window_bank(window) {
                Some(bank) => chunk.copy_from_slice(bank),
                None => debug!("texture window {} unmapped", window),
            }
        }

        let mut palette_bytes = vec![0u8; PALETTE_WINDOWS * PALETTE_BANK_SIZE];
        for (window, chunk) in palette_bytes.chunks_exact_mut(PALETTE_BANK_SIZE).enumerate() {
            match banks.palette_window_bank(window) {
                Some(bank) => chunk.copy_from_slice(bank),
                None => debug!("palette window {} unmapped", window),
            }
        }

        // Palette memory is only ever read as u16s.
        let palette = palette_bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Self { texture, palette }
    }

    /// Build from already-flattened memory. Shorter inputs are zero-padded,
    /// longer ones truncated.
    pub fn from_raw(texture: &[u8], palette: &[u16]) -> Self {
        let mut tex = vec![0u8; TEXTURE_MEMORY_SIZE];
        let n = texture.len().min(TEXTURE_MEMORY_SIZE);
        tex[..n].copy_from_slice(&texture[..n]);

        let mut pal = vec![0u16; PALETTE_ENTRY_COUNT];
        let n = palette.len().min(PALETTE_ENTRY_COUNT);
        pal[..n].copy_from_slice(&palette[..n]);

        Self {
            texture: tex,
            palette: pal,
        }
    }

    #[inline]
    pub fn texture_u8(&self, addr: u32) -> u8 {
        self.texture[(addr & TEXTURE_ADDR_MASK) as usize]
    }

    /// Little-endian u16 from texture memory; each byte wraps independently.
    #[inline]
    pub fn texture_u16(&self, addr: u32) -> u16 {
        let lo = self.texture_u8(addr) as u16;
        let hi = self.texture_u8(addr.wrapping_add(1)) as u16;
        lo | (hi << 8)
    }

    /// Palette entry at `index` (in u16 units).
    #[inline]
    pub fn palette_color(&self, index: u32) -> u16 {
        self.palette[(index & PALETTE_INDEX_MASK) as usize]
    }

    pub fn texture_memory(&self) -> &[u8] {
        &self.texture
    }

    pub fn palette_memory(&self) -> &[u16] {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(texture_map: [u32; 4], palette_map: [u32; 8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(VRAM_PAYLOAD_LEN);
        for m in texture_map.iter().chain(palette_map.iter()) {
            out.extend_from_slice(&m.to_le_bytes());
        }
        // Fill each bank with its own index so mappings are observable.
        for bank in 0..TEXTURE_BANK_COUNT {
            out.extend(std::iter::repeat(0xA0 + bank as u8).take(TEXTURE_BANK_SIZE));
        }
        for bank in 0..PALETTE_BANK_COUNT {
            out.extend(std::iter::repeat(0xE0 + bank as u8).take(PALETTE_BANK_SIZE));
        }
        out
    }

    fn map(texture_map: [u32; 4], palette_map: [u32; 8]) -> Vram {
        let data = payload(texture_map, palette_map);
        let mut reader = DumpReader::new(&data);
        let banks = VramBanks::read(&mut reader).unwrap();
        assert!(reader.is_empty());
        Vram::map(&banks)
    }

    #[test]
    fn payload_length() {
        assert_eq!(VRAM_PAYLOAD_LEN, 48 + 4 * 131072 + 6 * 16384);
    }

    #[test]
    fn texture_windows_follow_masks() {
        let vram = map([0b0010, 0, 0b1100, 0b0001], [0; 8]);
        assert_eq!(vram.texture_u8(0), 0xA1);
        assert_eq!(vram.texture_u8(TEXTURE_BANK_SIZE as u32), 0);
        // Lowest set bit wins.
        assert_eq!(vram.texture_u8(2 * TEXTURE_BANK_SIZE as u32), 0xA2);
        assert_eq!(vram.texture_u8(3 * TEXTURE_BANK_SIZE as u32 + 5), 0xA0);
    }

    #[test]
    fn palette_windows_follow_masks() {
        let vram = map([0; 4], [1 << 4, 1 << 4, 0, 1 << 4, 1 << 5, 1 << 6, 1 << 4, 0]);
        let per_window = (PALETTE_BANK_SIZE / 2) as u32;
        assert_eq!(vram.palette_color(0), 0xE0E0);
        assert_eq!(vram.palette_color(per_window), 0xE1E1);
        assert_eq!(vram.palette_color(2 * per_window), 0);
        assert_eq!(vram.palette_color(3 * per_window), 0xE3E3);
        assert_eq!(vram.palette_color(4 * per_window), 0xE4E4);
        assert_eq!(vram.palette_color(5 * per_window), 0xE5E5);
        // Window 6 reuses quarter 6 & 3 = 2 of bank E.
        assert_eq!(vram.palette_color(6 * per_window), 0xE2E2);
        assert_eq!(vram.palette_color(7 * per_window), 0);
    }

    #[test]
    fn reads_wrap_around() {
        let mut tex = vec![0u8; TEXTURE_MEMORY_SIZE];
        tex[0] = 0x12;
        tex[TEXTURE_MEMORY_SIZE - 1] = 0x34;
        let vram = Vram::from_raw(&tex, &[0xBEEF]);
        assert_eq!(vram.texture_u8(TEXTURE_MEMORY_SIZE as u32), 0x12);
        assert_eq!(vram.texture_u16(TEXTURE_MEMORY_SIZE as u32 - 1), 0x1234);
        assert_eq!(vram.palette_color(PALETTE_ENTRY_COUNT as u32), 0xBEEF);
        assert_eq!(vram.palette_color(0x1_0000), 0xBEEF);
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let data = payload([0; 4], [0; 8]);
        let mut reader = DumpReader::new(&data[..data.len() - 1]);
        assert!(VramBanks::read(&mut reader).is_err());
    }
}
