// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

/// Setup failures of the synthesis path. None of these can occur once the
/// generator is running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DspError {
    #[error("frequency {freq} Hz is outside (0, {nyquist}) Hz")]
    InvalidFrequency { freq: f64, nyquist: f64 },

    #[error("no full period of {freq} Hz found at {sample_rate} Hz")]
    NoPeriod { freq: f64, sample_rate: u32 },

    #[error("sample rate {0} Hz does not give a whole number of samples per RDS bit")]
    BitRateMismatch(u32),

    #[error("{0} data streams requested, at most {1} supported")]
    TooManyStreams(usize, usize),

    #[error("no carrier with index {0}")]
    NoSuchCarrier(usize),
}
