// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Biphase symbol shape used by the RDS modulator.
//!
//! Each data bit is sent as an impulse pair one half bit apart, filtered by
//! the RDS shaping response `H(f) = cos(pi * f * td / 4)` for
//! `0 <= f <= 2 / td` (`td` is one bit period). The filtered pair is
//! tabulated once over seven bit periods and normalised to a unit peak.

use std::f64::consts::PI;

use crate::error::DspError;
use crate::RDS_BIT_RATE;

/// Length of the tabulated symbol in bit periods.
pub const SYMBOL_SPAN_BITS: usize = 7;

/// Number of samples per RDS bit at `sample_rate`, if it is a whole number.
pub fn samples_per_bit(sample_rate: u32) -> Result<usize, DspError> {
    let spb = f64::from(sample_rate) / RDS_BIT_RATE;
    if spb < 2.0 || spb.fract() != 0.0 {
        return Err(DspError::BitRateMismatch(sample_rate));
    }
    Ok(spb as usize)
}

#[derive(Debug, Clone)]
pub struct BiphaseWaveform {
    positive: Vec<f32>,
    negative: Vec<f32>,
    samples_per_bit: usize,
}

impl BiphaseWaveform {
    pub fn new(sample_rate: u32) -> Result<Self, DspError> {
        let samples_per_bit = samples_per_bit(sample_rate)?;
        let filter_size = samples_per_bit * SYMBOL_SPAN_BITS;
        let fs = f64::from(sample_rate);
        let td = 1.0 / RDS_BIT_RATE;

        let raw: Vec<f64> = (0..filter_size)
            .map(|n| {
                let t = (n as f64 - filter_size as f64 / 2.0) / fs + td / 4.0;
                shaped_impulse(t, td) - shaped_impulse(t - td / 2.0, td)
            })
            .collect();
        let peak = raw.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let scale = if peak > 0.0 { 1.0 / peak } else { 1.0 };

        let positive: Vec<f32> = raw.iter().map(|v| (v * scale) as f32).collect();
        let negative = positive.iter().map(|v| -v).collect();
        Ok(Self {
            positive,
            negative,
            samples_per_bit,
        })
    }

    /// Symbol for one differentially encoded output bit.
    #[inline]
    pub fn shape(&self, bit: bool) -> &[f32] {
        if bit {
            &self.positive
        } else {
            &self.negative
        }
    }

    pub fn samples_per_bit(&self) -> usize {
        self.samples_per_bit
    }

    pub fn filter_size(&self) -> usize {
        self.positive.len()
    }
}

/// Impulse response of the shaping filter at time `t` (unnormalised).
fn shaped_impulse(t: f64, td: f64) -> f64 {
    // h(t) = 2 * integral_0^F cos(a f) cos(2 pi t f) df with a = pi td / 4
    let cutoff = 2.0 / td;
    let a = PI * td / 4.0;
    let b = 2.0 * PI * t;
    sine_integral(a - b, cutoff) + sine_integral(a + b, cutoff)
}

fn sine_integral(k: f64, cutoff: f64) -> f64 {
    if k.abs() < 1e-12 {
        cutoff
    } else {
        (k * cutoff).sin() / k
    }
}
