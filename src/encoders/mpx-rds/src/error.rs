// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

/// Rejected setter input. The active content is never touched when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RdsError {
    #[error("AF list is full ({0} entries)")]
    AfListFull(usize),

    #[error("{0} is not a valid alternative frequency")]
    InvalidAfFrequency(f32),

    #[error("{field} is limited to {max} characters")]
    TextTooLong { field: &'static str, max: usize },

    #[error("character {0:?} has no RDS encoding")]
    UnsupportedCharacter(char),

    #[error("PTY {0} out of range 0..=31")]
    PtyOutOfRange(u8),

    #[error("DI {0} out of range 0..=15")]
    DiOutOfRange(u8),

    #[error("RT+ tag field {index} value {value} out of range")]
    TagOutOfRange { index: usize, value: u8 },

    #[error("ODA registry is full ({0} entries)")]
    OdaRegistryFull(usize),

    #[error("eRT cannot be carried in a version B group")]
    ErtVersionB,

    #[error("call sign {0:?} cannot be converted to a PI code")]
    InvalidCallsign(String),

    #[error("RFT file is empty")]
    RftEmptyFile,

    #[error("RFT file is {0} bytes, limit is {1}")]
    RftFileTooLarge(usize, usize),

    #[error("RFT channel {0} out of range 0..=15")]
    RftChannelOutOfRange(u8),

    #[error("at most {0} RDS2 streams are supported")]
    TooManyStreams(usize),
}
