// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Wavetable oscillator for the pilot and data subcarriers.

use std::f64::consts::TAU;

use crate::error::DspError;

/// Magnitude below which a sine table entry counts as a zero crossing.
const ZERO_THRESHOLD: f64 = 1e-5;

/// Phase-continuous sine/cosine source backed by one precomputed period.
#[derive(Debug, Clone)]
pub struct Oscillator {
    sin_table: Vec<f32>,
    cos_table: Vec<f32>,
    phase: usize,
    freq_hz: f64,
}

impl Oscillator {
    /// Build the tables for `freq_hz` at `sample_rate`.
    ///
    /// The table length is found by stepping until the sine has crossed zero
    /// twice, so frequencies that do not divide the sample rate still get a
    /// seamless loop (e.g. 57 kHz at 190 kHz loops after 3 cycles).
    pub fn new(sample_rate: u32, freq_hz: f64) -> Result<Self, DspError> {
        let nyquist = f64::from(sample_rate) / 2.0;
        if !(freq_hz > 0.0 && freq_hz < nyquist) {
            return Err(DspError::InvalidFrequency {
                freq: freq_hz,
                nyquist,
            });
        }

        let step = TAU * freq_hz / f64::from(sample_rate);
        let limit = sample_rate as usize;
        let mut sin_table = vec![0.0f32];
        let mut cos_table = vec![1.0f32];
        let mut zero_crossings = 0;
        let mut index = 1usize;

        while zero_crossings < 2 {
            if index >= limit {
                return Err(DspError::NoPeriod {
                    freq: freq_hz,
                    sample_rate,
                });
            }
            let (sin, cos) = (step * index as f64).sin_cos();
            if sin.abs() < ZERO_THRESHOLD {
                zero_crossings += 1;
                sin_table.push(0.0);
            } else {
                sin_table.push(sin as f32);
            }
            cos_table.push(cos as f32);
            index += 1;
        }

        // The second crossing is the first sample of the next period.
        let period = index - 1;
        sin_table.truncate(period);
        cos_table.truncate(period);

        Ok(Self {
            sin_table,
            cos_table,
            phase: 0,
            freq_hz,
        })
    }

    #[inline]
    pub fn sin(&self) -> f32 {
        self.sin_table[self.phase]
    }

    #[inline]
    pub fn cos(&self) -> f32 {
        self.cos_table[self.phase]
    }

    /// Step one sample forward, wrapping at the end of the period.
    #[inline]
    pub fn advance(&mut self) {
        self.phase += 1;
        if self.phase == self.sin_table.len() {
            self.phase = 0;
        }
    }

    pub fn period(&self) -> usize {
        self.sin_table.len()
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn freq_hz(&self) -> f64 {
        self.freq_hz
    }
}
