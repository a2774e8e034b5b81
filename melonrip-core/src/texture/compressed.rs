// 4x4 block-compressed textures.
//
// Texel data is a run of 4-byte blocks, one byte per block row, 2 bits per
// texel. Each block also owns a 16-bit "palette info" word in slot 1 of
// texture memory:
//
//   bits 0-13  palette offset, in units of 2 palette entries
//   bits 14-15 palette mode
//
// Mode | color 2                  | color 3
// -----+--------------------------+---------------------------
//   0  | palette[2]               | transparent
//   1  | (c0 + c1) / 2            | transparent
//   2  | palette[2]               | palette[3]
//   3  | (5*c0 + 3*c1) / 8        | (3*c0 + 5*c1) / 8
//
// Colors 0 and 1 are always palette[0] and palette[1]. Blends are computed on
// each 5-bit channel in place and masked back to that channel's bits.

use super::cache::TextureKey;
use super::decode::Texel;
use crate::vram::Vram;

const R_MASK: u32 = 0x001F;
const G_MASK: u32 = 0x03E0;
const B_MASK: u32 = 0x7C00;

/// Slot 1 address of the palette info word for the block at `addr`.
#[inline]
pub fn palette_info_address(addr: u32) -> u32 {
    let mut slot1 = 0x20000 + ((addr & 0x1FFFC) >> 1);
    if addr >= 0x40000 {
        slot1 += 0x10000;
    }
    slot1
}

/// Per-channel weighted blend `(c0*w0 + c1*w1) >> shift`.
#[inline]
fn blend(c0: u16, c1: u16, w0: u32, w1: u32, shift: u32) -> u16 {
    let (c0, c1) = (c0 as u32, c1 as u32);
    let channel = |mask: u32| (((c0 & mask) * w0 + (c1 & mask) * w1) >> shift) & mask;
    (channel(R_MASK) | channel(G_MASK) | channel(B_MASK)) as u16
}

/// The four colors a block's 2-bit indices select from.
pub fn block_palette(vram: &Vram, palette_offset: u32, mode: u16) -> [Texel; 4] {
    let entry = |i: u32| vram.palette_color(palette_offset.wrapping_add(i));
    let c0 = entry(0);
    let c1 = entry(1);

    let (c2, c3) = match mode & 3 {
        0 => (Texel::opaque(entry(2)), Texel::TRANSPARENT),
        1 => (Texel::opaque(blend(c0, c1, 1, 1, 1)), Texel::TRANSPARENT),
        2 => (Texel::opaque(entry(2)), Texel::opaque(entry(3))),
        _ => (
            Texel::opaque(blend(c0, c1, 5, 3, 3)),
            Texel::opaque(blend(c0, c1, 3, 5, 3)),
        ),
    };

    [Texel::opaque(c0), Texel::opaque(c1), c2, c3]
}

/// Texels in console scan order.
pub fn decode_compressed(vram: &Vram, key: &TextureKey) -> Vec<Texel> {
    let width = key.width;
    let blocks_per_row = width / 4;
    let block_count = key.width * key.height / 16;
    let pal_base = key.palette_base << 3;

    let mut texels = vec![Texel::TRANSPARENT; (key.width * key.height) as usize];

    for block in 0..block_count {
        let addr = key.vram_offset.wrapping_add(block * 4);

        let info = vram.texture_u16(palette_info_address(addr));
        let palette_offset = pal_base.wrapping_add(((info & 0x3FFF) as u32) << 1);
        let colors = block_palette(vram, palette_offset, info >> 14);

        let x0 = (block % blocks_per_row) * 4;
        let y0 = (block / blocks_per_row) * 4;
        for row in 0..4 {
            let packed = vram.texture_u8(addr.wrapping_add(row));
            let start = ((y0 + row) * width + x0) as usize;
            for (col, texel) in texels[start..start + 4].iter_mut().enumerate() {
                *texel = colors[((packed >> (col * 2)) & 3) as usize];
            }
        }
    }

    texels
}
