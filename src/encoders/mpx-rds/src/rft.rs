// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! RDS2 file transfer (RFT) over a dedicated data stream.
//!
//! A 16-group cycle repeats forever: one file-description group, one chunk
//! CRC group and fourteen data groups of five bytes each.

use crate::crc::crc16;
use crate::error::RdsError;
use crate::group::BlockQuad;

pub const MAX_FILE_LEN: usize = 163_840;
const SEGMENT_LEN: usize = 5;
const CYCLE_LEN: u8 = 16;
const RFT_AID: u16 = 0xFF7F;
const CRC_MODE_AUTO: u8 = 7;

#[derive(Debug, Clone)]
pub struct RftSender {
    channel: u8,
    file_id: u8,
    file_version: u8,
    file_len: usize,
    data: Vec<u8>,
    segments: usize,
    crcs: Vec<u16>,
    state: u8,
    seg_addr: usize,
    chunk_addr: usize,
}

impl RftSender {
    pub fn new(channel: u8, file: &[u8]) -> Result<Self, RdsError> {
        if file.is_empty() {
            return Err(RdsError::RftEmptyFile);
        }
        if file.len() > MAX_FILE_LEN {
            return Err(RdsError::RftFileTooLarge(file.len(), MAX_FILE_LEN));
        }
        if channel > 15 {
            return Err(RdsError::RftChannelOutOfRange(channel));
        }

        let segments = file.len().div_ceil(SEGMENT_LEN);
        let packet_len = chunk_segments(file.len()) * SEGMENT_LEN;
        let chunks = file.len().div_ceil(packet_len);

        let mut data = vec![0u8; chunks * packet_len];
        data[..file.len()].copy_from_slice(file);
        let crcs = data.chunks(packet_len).map(crc16).collect();

        Ok(Self {
            channel,
            file_id: 0,
            file_version: 0,
            file_len: file.len(),
            data,
            segments,
            crcs,
            state: 0,
            seg_addr: 0,
            chunk_addr: 0,
        })
    }

    pub fn with_identity(mut self, file_id: u8, file_version: u8) -> Self {
        self.file_id = file_id & 0x3F;
        self.file_version = file_version & 0x07;
        self
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn chunk_crcs(&self) -> &[u16] {
        &self.crcs
    }

    pub fn next_group(&mut self) -> BlockQuad {
        let blocks = match self.state {
            0 => self.file_description(),
            1 => self.chunk_crc(),
            _ => self.data_segment(),
        };
        self.state = (self.state + 1) % CYCLE_LEN;
        blocks
    }

    fn function_header(&self) -> u16 {
        0x8000 | u16::from(self.channel)
    }

    fn file_description(&self) -> BlockQuad {
        let len = self.file_len as u32;
        [
            self.function_header(),
            RFT_AID,
            u16::from(CRC_MODE_AUTO & 1) << 11
                | u16::from(self.file_version & 0x07) << 8
                | u16::from(self.file_id & 0x3F) << 2
                | ((len >> 16) & 0x03) as u16,
            (len & 0xFFFF) as u16,
        ]
    }

    fn chunk_crc(&mut self) -> BlockQuad {
        let addr = self.chunk_addr;
        self.chunk_addr = (addr + 1) % self.crcs.len();
        [
            self.function_header(),
            RFT_AID,
            1 << 12 | u16::from(CRC_MODE_AUTO & 0x07) << 9 | (addr & 0x1FF) as u16,
            self.crcs[addr],
        ]
    }

    fn data_segment(&mut self) -> BlockQuad {
        let seg = self.seg_addr;
        self.seg_addr = (seg + 1) % self.segments;
        let d = &self.data[seg * SEGMENT_LEN..(seg + 1) * SEGMENT_LEN];
        [
            2 << 12 | u16::from(self.channel & 0x0F) << 8 | ((seg >> 8) & 0x7F) as u16,
            ((seg & 0xFF) as u16) << 8 | u16::from(d[0]),
            u16::from_be_bytes([d[1], d[2]]),
            u16::from_be_bytes([d[3], d[4]]),
        ]
    }
}

/// Segments per CRC chunk, chosen from the file size.
fn chunk_segments(len: usize) -> usize {
    if len > 81_960 {
        64
    } else if len > 40_960 {
        32
    } else {
        16
    }
}
