// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Fixed-size text payloads, validated once when they are set.

use std::fmt;

use crate::charset;
use crate::error::RdsError;

pub const PS_LEN: usize = 8;
pub const PTYN_LEN: usize = 8;
pub const RT_LEN: usize = 64;
pub const LPS_LEN: usize = 32;
pub const ERT_LEN: usize = 128;

/// Number of 4-byte segments needed for `len` bytes plus an end marker,
/// capped at the full buffer.
fn marked_segments(len: usize, capacity: usize) -> u8 {
    if len >= capacity {
        (capacity / 4) as u8
    } else {
        (len + 1).div_ceil(4) as u8
    }
}

/// Programme Service name: eight characters, space padded.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PsText([u8; PS_LEN]);

impl PsText {
    pub fn new(text: &str) -> Result<Self, RdsError> {
        let mut buf = [b' '; PS_LEN];
        charset::encode_into("PS", text, &mut buf)?;
        Ok(Self(buf))
    }

    pub fn bytes(&self) -> &[u8; PS_LEN] {
        &self.0
    }

    pub fn pair(&self, segment: usize) -> [u8; 2] {
        let i = (segment % 4) * 2;
        [self.0[i], self.0[i + 1]]
    }
}

impl Default for PsText {
    fn default() -> Self {
        Self([b' '; PS_LEN])
    }
}

impl fmt::Display for PsText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&charset::decode(&self.0))
    }
}

impl fmt::Debug for PsText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PsText({:?})", self.to_string())
    }
}

/// Programme Type Name; an empty name disables group 10A.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PtynText {
    bytes: [u8; PTYN_LEN],
    empty: bool,
}

impl PtynText {
    pub fn new(text: &str) -> Result<Self, RdsError> {
        let mut bytes = [b' '; PTYN_LEN];
        let len = charset::encode_into("PTYN", text, &mut bytes)?;
        Ok(Self {
            bytes,
            empty: len == 0,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn quad(&self, segment: usize) -> [u8; 4] {
        quad(&self.bytes, segment % 2)
    }
}

impl Default for PtynText {
    fn default() -> Self {
        Self {
            bytes: [b' '; PTYN_LEN],
            empty: true,
        }
    }
}

impl fmt::Display for PtynText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty {
            return Ok(());
        }
        f.write_str(charset::decode(&self.bytes).trim_end())
    }
}

impl fmt::Debug for PtynText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PtynText({:?})", self.to_string())
    }
}

/// RadioText: up to 64 characters, terminated by a carriage return when
/// shorter.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RadioText {
    bytes: [u8; RT_LEN],
    segments: u8,
}

impl RadioText {
    pub fn new(text: &str) -> Result<Self, RdsError> {
        let mut bytes = [b' '; RT_LEN];
        let len = charset::encode_into("RT", text, &mut bytes)?;
        if len < RT_LEN {
            bytes[len] = b'\r';
        }
        Ok(Self {
            bytes,
            segments: marked_segments(len, RT_LEN),
        })
    }

    pub fn segments(&self) -> usize {
        usize::from(self.segments)
    }

    pub fn quad(&self, segment: usize) -> [u8; 4] {
        quad(&self.bytes, segment)
    }
}

impl Default for RadioText {
    fn default() -> Self {
        let mut bytes = [b' '; RT_LEN];
        bytes[0] = b'\r';
        Self { bytes, segments: 1 }
    }
}

impl fmt::Display for RadioText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&charset::decode(&self.bytes))
    }
}

impl fmt::Debug for RadioText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RadioText({:?}, {} segments)", self.to_string(), self.segments)
    }
}

/// Long PS (group 15A): up to 32 bytes of UTF-8, carriage-return padded.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LongPs {
    bytes: [u8; LPS_LEN],
    segments: u8,
}

impl LongPs {
    pub fn new(text: &str) -> Result<Self, RdsError> {
        let mut bytes = [b'\r'; LPS_LEN];
        let len = charset::copy_utf8_into("LPS", text, &mut bytes)?;
        Ok(Self {
            bytes,
            segments: len.div_ceil(4) as u8,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.segments == 0
    }

    pub fn segments(&self) -> usize {
        usize::from(self.segments)
    }

    pub fn quad(&self, segment: usize) -> [u8; 4] {
        quad(&self.bytes, segment)
    }
}

impl Default for LongPs {
    fn default() -> Self {
        Self {
            bytes: [b'\r'; LPS_LEN],
            segments: 0,
        }
    }
}

impl fmt::Display for LongPs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&utf8_until_cr(&self.bytes))
    }
}

impl fmt::Debug for LongPs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LongPs({:?})", self.to_string())
    }
}

/// Enhanced RadioText: up to 128 bytes of UTF-8.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EnhancedText {
    bytes: [u8; ERT_LEN],
    segments: u8,
}

impl EnhancedText {
    pub fn new(text: &str) -> Result<Self, RdsError> {
        let mut bytes = [b'\r'; ERT_LEN];
        let len = charset::copy_utf8_into("eRT", text, &mut bytes)?;
        let segments = if len == 0 {
            0
        } else {
            marked_segments(len, ERT_LEN)
        };
        Ok(Self { bytes, segments })
    }

    pub fn is_empty(&self) -> bool {
        self.segments == 0
    }

    pub fn segments(&self) -> usize {
        usize::from(self.segments)
    }

    pub fn quad(&self, segment: usize) -> [u8; 4] {
        quad(&self.bytes, segment)
    }
}

impl Default for EnhancedText {
    fn default() -> Self {
        Self {
            bytes: [b'\r'; ERT_LEN],
            segments: 0,
        }
    }
}

impl fmt::Display for EnhancedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&utf8_until_cr(&self.bytes))
    }
}

impl fmt::Debug for EnhancedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnhancedText({:?})", self.to_string())
    }
}

fn quad(bytes: &[u8], segment: usize) -> [u8; 4] {
    let start = (segment * 4) % bytes.len();
    [
        bytes[start],
        bytes[start + 1],
        bytes[start + 2],
        bytes[start + 3],
    ]
}

fn utf8_until_cr(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == b'\r').unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
