// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Alternative Frequency list (method A).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RdsError;

pub const MAX_AFS: usize = 25;
const MAX_ENTRIES: usize = MAX_AFS * 2;

const CODE_NO_AF: u8 = 224;
const CODE_FILLER: u8 = 205;
const CODE_LFMF_FOLLOWS: u8 = 250;

/// Broadcast region; decides the MF channel raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    Europe,
    NorthAmerica,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AfList {
    region: Region,
    entries: [u8; MAX_ENTRIES],
    len: usize,
    count: usize,
}

impl AfList {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            entries: [0; MAX_ENTRIES],
            len: 0,
            count: 0,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Number of frequencies, not code entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn entries(&self) -> &[u8] {
        &self.entries[..self.len]
    }

    /// Add a frequency in MHz (FM) or kHz (LF/MF).
    pub fn add(&mut self, freq: f32) -> Result<(), RdsError> {
        if self.count >= MAX_AFS {
            return Err(RdsError::AfListFull(MAX_AFS));
        }
        match self.encode(freq)? {
            (None, code) => self.push(&[code]),
            (Some(marker), code) => self.push(&[marker, code]),
        }
        self.count += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.count = 0;
    }

    fn push(&mut self, codes: &[u8]) {
        self.entries[self.len..self.len + codes.len()].copy_from_slice(codes);
        self.len += codes.len();
    }

    fn encode(&self, freq: f32) -> Result<(Option<u8>, u8), RdsError> {
        if (87.6..=107.9).contains(&freq) {
            let code = (f64::from(freq) * 10.0).round() as i32 - 875;
            return Ok((None, code as u8));
        }
        let mf = match self.region {
            Region::Europe if (153.0..=279.0).contains(&freq) => {
                Some((freq as u16 - 153) / 9 + 1)
            }
            Region::Europe if (531.0..=1602.0).contains(&freq) => {
                Some((freq as u16 - 531) / 9 + 16)
            }
            Region::NorthAmerica if (530.0..=1610.0).contains(&freq) => {
                Some((freq as u16 - 530) / 10 + 16)
            }
            _ => None,
        };
        mf.map(|code| (Some(CODE_LFMF_FOLLOWS), code as u8))
            .ok_or(RdsError::InvalidAfFrequency(freq))
    }

    /// Block 2 of the next 0A group and the cursor to use after it.
    ///
    /// The first pair carries the frequency count; the rest walk the entry
    /// list two codes at a time, padding the last odd one with the filler.
    pub fn code_pair(&self, cursor: usize) -> (u16, usize) {
        if self.count == 0 {
            return (u16::from(CODE_NO_AF) << 8 | u16::from(CODE_FILLER), 0);
        }
        let entries = self.entries();
        let (hi, lo, next) = if cursor == 0 || cursor >= entries.len() {
            (CODE_NO_AF + self.count as u8, entries[0], 1)
        } else {
            let lo = entries.get(cursor + 1).copied().unwrap_or(CODE_FILLER);
            (entries[cursor], lo, cursor + 2)
        };
        let next = if next >= entries.len() { 0 } else { next };
        (u16::from(hi) << 8 | u16::from(lo), next)
    }

    fn mf_khz(&self, code: u8) -> u32 {
        let code = u32::from(code);
        match (self.region, code) {
            (Region::Europe, 1..=15) => 153 + (code - 1) * 9,
            (Region::Europe, _) => 531 + (code - 16) * 9,
            (Region::NorthAmerica, _) => 530 + (code - 16) * 10,
        }
    }

    /// Human-readable frequencies in list order.
    pub fn frequencies(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.count);
        let mut lfmf = false;
        for &code in self.entries() {
            if code == CODE_LFMF_FOLLOWS {
                lfmf = true;
                continue;
            }
            if lfmf {
                out.push(format!("{} kHz", self.mf_khz(code)));
                lfmf = false;
            } else {
                out.push(format!("{:.1} MHz", (f32::from(code) + 875.0) / 10.0));
            }
        }
        out
    }
}

impl Default for AfList {
    fn default() -> Self {
        Self::new(Region::default())
    }
}

impl fmt::Display for AfList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AFs", self.count)?;
        let freqs = self.frequencies();
        if !freqs.is_empty() {
            write!(f, ": {}", freqs.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Debug for AfList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AfList")
            .field("region", &self.region)
            .field("entries", &self.entries())
            .finish()
    }
}
