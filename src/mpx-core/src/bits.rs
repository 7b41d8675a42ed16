// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

pub const BLOCKS_PER_GROUP: usize = 4;
pub const BITS_PER_BLOCK: usize = 26;
pub const BITS_PER_GROUP: usize = BLOCKS_PER_GROUP * BITS_PER_BLOCK;

const GROUP_MASK: u128 = (1 << BITS_PER_GROUP) - 1;
const BLOCK_MASK: u32 = (1 << BITS_PER_BLOCK) - 1;

/// One coded RDS group: four 26-bit blocks, first transmitted bit at the top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupBits(u128);

impl GroupBits {
    /// Concatenate four coded blocks (16 data bits followed by 10 check bits
    /// each) in transmission order.
    pub fn from_blocks(coded: [u32; BLOCKS_PER_GROUP]) -> Self {
        let raw = coded.iter().fold(0u128, |acc, &block| {
            (acc << BITS_PER_BLOCK) | u128::from(block & BLOCK_MASK)
        });
        Self(raw)
    }

    pub fn from_raw(raw: u128) -> Self {
        Self(raw & GROUP_MASK)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Bit at transmission position `index`; positions past the group read as 0.
    pub fn bit(&self, index: usize) -> bool {
        if index >= BITS_PER_GROUP {
            return false;
        }
        (self.0 >> (BITS_PER_GROUP - 1 - index)) & 1 == 1
    }

    /// Coded 26-bit word of block `index` (0..4).
    pub fn block(&self, index: usize) -> u32 {
        if index >= BLOCKS_PER_GROUP {
            return 0;
        }
        let shift = (BLOCKS_PER_GROUP - 1 - index) * BITS_PER_BLOCK;
        ((self.0 >> shift) as u32) & BLOCK_MASK
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..BITS_PER_GROUP).map(move |i| self.bit(i))
    }
}
