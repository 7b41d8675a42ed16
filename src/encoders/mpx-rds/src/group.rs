// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Group types and the per-type payload layouts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::rtplus::RtPlusTag;

/// One RDS group before checkwords are added.
pub type BlockQuad = [u16; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupVersion {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupType {
    pub number: u8,
    pub version: GroupVersion,
}

impl GroupType {
    pub const BASIC_TUNING: GroupType = GroupType::a(0);
    pub const BASIC_TUNING_B: GroupType = GroupType::b(0);
    pub const RADIO_TEXT: GroupType = GroupType::a(2);
    pub const ODA: GroupType = GroupType::a(3);
    pub const CLOCK_TIME: GroupType = GroupType::a(4);
    pub const PTYN: GroupType = GroupType::a(10);
    pub const RT_PLUS: GroupType = GroupType::a(11);
    pub const ERT: GroupType = GroupType::a(12);
    pub const ERT_PLUS: GroupType = GroupType::a(13);
    pub const LONG_PS: GroupType = GroupType::a(15);

    pub const fn a(number: u8) -> Self {
        Self {
            number,
            version: GroupVersion::A,
        }
    }

    pub const fn b(number: u8) -> Self {
        Self {
            number,
            version: GroupVersion::B,
        }
    }

    pub fn is_version_b(self) -> bool {
        self.version == GroupVersion::B
    }

    /// Type and version bits as they sit in block 1 (bits 15..11).
    pub fn block_bits(self) -> u16 {
        (u16::from(self.number & 0x0F) << 12) | (u16::from(self.is_version_b()) << 11)
    }

    pub fn from_block(block1: u16) -> Self {
        let number = ((block1 >> 12) & 0x0F) as u8;
        if (block1 >> 11) & 1 == 1 {
            Self::b(number)
        } else {
            Self::a(number)
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = match self.version {
            GroupVersion::A => 'A',
            GroupVersion::B => 'B',
        };
        write!(f, "{}{}", self.number, version)
    }
}

/// Payload of one scheduled group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupContent {
    /// 0A/0B: TA, MS, one DI bit, one AF pair (0A only) and two PS characters.
    BasicTuning {
        version: GroupVersion,
        ta: bool,
        ms: bool,
        di_bit: bool,
        segment: u8,
        af: u16,
        chars: [u8; 2],
    },
    /// 2A: four RadioText characters.
    RadioText { ab: bool, segment: u8, chars: [u8; 4] },
    /// 3A: announces which group carries an open data application.
    OdaAnnouncement { target: GroupType, aid: u16, message: u16 },
    /// 4A: clock time and date.
    ClockTime(ClockTime),
    /// 10A: four PTYN characters.
    ProgramTypeName { segment: u8, chars: [u8; 4] },
    /// RT+ / eRT+ tagging on the group the application was registered on.
    Tagging {
        group: GroupType,
        running: bool,
        toggle: bool,
        tags: [RtPlusTag; 2],
    },
    /// eRT: four bytes of UTF-8 text.
    EnhancedText {
        group: GroupType,
        segment: u8,
        chars: [u8; 4],
    },
    /// 15A: four bytes of the long PS.
    LongPs { segment: u8, chars: [u8; 4] },
}

impl GroupContent {
    pub fn group_type(&self) -> GroupType {
        match self {
            GroupContent::BasicTuning { version, .. } => GroupType {
                number: 0,
                version: *version,
            },
            GroupContent::RadioText { .. } => GroupType::RADIO_TEXT,
            GroupContent::OdaAnnouncement { .. } => GroupType::ODA,
            GroupContent::ClockTime(_) => GroupType::CLOCK_TIME,
            GroupContent::ProgramTypeName { .. } => GroupType::PTYN,
            GroupContent::Tagging { group, .. } => *group,
            GroupContent::EnhancedText { group, .. } => *group,
            GroupContent::LongPs { .. } => GroupType::LONG_PS,
        }
    }

    /// Write the type-specific bits of blocks 1..=3.
    fn write_payload(&self, blocks: &mut BlockQuad) {
        match *self {
            GroupContent::BasicTuning {
                ta,
                ms,
                di_bit,
                segment,
                af,
                chars,
                ..
            } => {
                blocks[1] |= u16::from(ta) << 4
                    | u16::from(ms) << 3
                    | u16::from(di_bit) << 2
                    | u16::from(segment & 0x03);
                blocks[2] = af;
                blocks[3] = u16::from_be_bytes(chars);
            }
            GroupContent::RadioText { ab, segment, chars } => {
                blocks[1] |= u16::from(ab) << 4 | u16::from(segment & 0x0F);
                write_chars(blocks, chars);
            }
            GroupContent::OdaAnnouncement {
                target,
                aid,
                message,
            } => {
                blocks[1] |= u16::from(target.number & 0x0F) << 1 | u16::from(target.is_version_b());
                blocks[2] = message;
                blocks[3] = aid;
            }
            GroupContent::ClockTime(ct) => {
                let [b1, b2, b3] = ct.payload();
                blocks[1] |= b1;
                blocks[2] = b2;
                blocks[3] = b3;
            }
            GroupContent::ProgramTypeName { segment, chars } => {
                blocks[1] |= u16::from(segment & 0x01);
                write_chars(blocks, chars);
            }
            GroupContent::Tagging {
                running,
                toggle,
                tags,
                ..
            } => {
                let [first, second] = tags;
                blocks[1] |= u16::from(toggle) << 4
                    | u16::from(running) << 3
                    | u16::from((first.content_type & 0x38) >> 3);
                blocks[2] = u16::from(first.content_type & 0x07) << 13
                    | u16::from(first.start & 0x3F) << 7
                    | u16::from(first.len & 0x3F) << 1
                    | u16::from((second.content_type & 0x20) >> 5);
                blocks[3] = u16::from(second.content_type & 0x1F) << 11
                    | u16::from(second.start & 0x3F) << 5
                    | u16::from(second.len & 0x1F);
            }
            GroupContent::EnhancedText { segment, chars, .. } => {
                blocks[1] |= u16::from(segment & 0x1F);
                write_chars(blocks, chars);
            }
            GroupContent::LongPs { segment, chars } => {
                blocks[1] |= u16::from(segment & 0x07);
                write_chars(blocks, chars);
            }
        }
    }
}

fn write_chars(blocks: &mut BlockQuad, chars: [u8; 4]) {
    blocks[2] = u16::from_be_bytes([chars[0], chars[1]]);
    blocks[3] = u16::from_be_bytes([chars[2], chars[3]]);
}

/// Fields common to every group on a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupHeader {
    pub pi: u16,
    pub tp: bool,
    pub pty: u8,
    /// RDS2 tunneling: block 0 is sent as 0x0000.
    pub tunnel: bool,
}

/// Build the complete block quad for `content`, including the PI echo in
/// block 2 of version B groups.
pub fn assemble(header: GroupHeader, content: &GroupContent) -> BlockQuad {
    let group = content.group_type();
    let mut blocks: BlockQuad = [
        header.pi,
        u16::from(header.tp) << 10 | u16::from(header.pty & 0x1F) << 5,
        0,
        0,
    ];
    blocks[1] |= group.block_bits();
    content.write_payload(&mut blocks);
    if (blocks[1] >> 11) & 1 == 1 {
        blocks[2] = header.pi;
    }
    if header.tunnel {
        blocks[0] = 0;
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> GroupHeader {
        GroupHeader {
            pi: 0x1000,
            tp: true,
            pty: 10,
            tunnel: false,
        }
    }

    #[test]
    fn group_type_bits_round_trip() {
        assert_eq!(GroupType::RT_PLUS.block_bits(), 0xB000);
        assert_eq!(GroupType::b(2).block_bits(), 0x2800);
        assert_eq!(GroupType::from_block(0x2800), GroupType::b(2));
        assert_eq!(GroupType::ERT_PLUS.to_string(), "13A");
    }

    #[test]
    fn basic_tuning_layout() {
        let content = GroupContent::BasicTuning {
            version: GroupVersion::A,
            ta: true,
            ms: true,
            di_bit: true,
            segment: 2,
            af: 0xE162,
            chars: *b"GE",
        };
        let blocks = assemble(header(), &content);
        assert_eq!(blocks[0], 0x1000);
        assert_eq!(blocks[1], 0x0400 | 10 << 5 | 0x10 | 0x08 | 0x04 | 2);
        assert_eq!(blocks[2], 0xE162);
        assert_eq!(blocks[3], u16::from_be_bytes(*b"GE"));
    }

    #[test]
    fn version_b_echoes_pi_in_block_two() {
        let content = GroupContent::BasicTuning {
            version: GroupVersion::B,
            ta: false,
            ms: false,
            di_bit: false,
            segment: 0,
            af: 0xE0CD,
            chars: *b"MP",
        };
        let blocks = assemble(header(), &content);
        assert_eq!(GroupType::from_block(blocks[1]), GroupType::BASIC_TUNING_B);
        assert_eq!(blocks[2], 0x1000);
    }

    #[test]
    fn tunneling_clears_block_zero_after_pi_echo() {
        let content = GroupContent::BasicTuning {
            version: GroupVersion::B,
            ta: false,
            ms: false,
            di_bit: false,
            segment: 0,
            af: 0,
            chars: *b"MP",
        };
        let blocks = assemble(
            GroupHeader {
                tunnel: true,
                ..header()
            },
            &content,
        );
        assert_eq!(blocks[0], 0);
        assert_eq!(blocks[2], 0x1000);
    }

    #[test]
    fn oda_announcement_layout() {
        let content = GroupContent::OdaAnnouncement {
            target: GroupType::RT_PLUS,
            aid: 0x4BD7,
            message: 0,
        };
        let blocks = assemble(header(), &content);
        assert_eq!(blocks[1] & 0xF800, 0x3000);
        assert_eq!(blocks[1] & 0x1F, 11 << 1);
        assert_eq!(blocks[3], 0x4BD7);
    }

    #[test]
    fn tagging_layout() {
        let content = GroupContent::Tagging {
            group: GroupType::RT_PLUS,
            running: true,
            toggle: false,
            tags: [
                RtPlusTag {
                    content_type: 4,
                    start: 0,
                    len: 10,
                },
                RtPlusTag {
                    content_type: 33,
                    start: 13,
                    len: 5,
                },
            ],
        };
        let blocks = assemble(header(), &content);
        assert_eq!(blocks[1] & 0x1F, 0x08);
        assert_eq!(blocks[2], 4 << 13 | 10 << 1 | 1);
        assert_eq!(blocks[3], 1 << 11 | 13 << 5 | 5);
    }
}
