// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Block checkwords and offset words.

use mpx_core::{GroupBits, BLOCKS_PER_GROUP};

use crate::group::BlockQuad;

const RDS_POLY: u16 = 0x1B9;

pub const OFFSET_A: u16 = 0x0FC;
pub const OFFSET_B: u16 = 0x198;
pub const OFFSET_C: u16 = 0x168;
pub const OFFSET_CP: u16 = 0x350;
pub const OFFSET_D: u16 = 0x1B4;

/// Offset-word rule for the stream a group is sent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodingMode {
    /// Legacy 57 kHz stream: version B groups use C' in block 2.
    #[default]
    Rds,
    /// RDS2 upper streams: only tunneled version B groups (block 0 zeroed)
    /// use C'.
    Rds2,
}

/// 10-bit remainder of `data * x^10` modulo the RDS generator polynomial.
pub fn crc10(data: u16) -> u16 {
    let mut reg = u32::from(data) << 10;
    let poly = u32::from(RDS_POLY);
    for shift in (10..=25).rev() {
        if (reg & (1 << shift)) != 0 {
            reg ^= poly << (shift - 10);
        }
    }
    (reg & 0x03ff) as u16
}

/// 26-bit coded block: data followed by checkword XOR offset.
pub fn coded_block(data: u16, offset: u16) -> u32 {
    (u32::from(data) << 10) | u32::from(crc10(data) ^ offset)
}

/// Offset words for the four blocks of `blocks`.
pub fn offsets(blocks: &BlockQuad, mode: CodingMode) -> [u16; BLOCKS_PER_GROUP] {
    let version_b = (blocks[1] >> 11) & 1 == 1;
    let use_cp = match mode {
        CodingMode::Rds => version_b,
        CodingMode::Rds2 => version_b && blocks[0] == 0,
    };
    let third = if use_cp { OFFSET_CP } else { OFFSET_C };
    [OFFSET_A, OFFSET_B, third, OFFSET_D]
}

/// Code a fully populated block quad into its 104-bit transmission form.
pub fn encode(blocks: &BlockQuad, mode: CodingMode) -> GroupBits {
    let offsets = offsets(blocks, mode);
    let mut coded = [0u32; BLOCKS_PER_GROUP];
    for (i, word) in coded.iter_mut().enumerate() {
        *word = coded_block(blocks[i], offsets[i]);
    }
    GroupBits::from_blocks(coded)
}
