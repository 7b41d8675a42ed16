// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! MPX mixer: pilot tone plus modulated RDS/RDS2 subcarriers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DspError;
use crate::modulator::{GroupSource, Modulator};
use crate::osc::Oscillator;
use crate::waveform::BiphaseWaveform;
use crate::{MAX_STREAMS, PILOT_HZ, RDS2_CARRIERS_HZ, RDS_CARRIER_HZ};

/// Ceiling for any single carrier level, in percent of full deviation.
pub const MAX_CARRIER_VOLUME: f32 = 15.0;
const MAX_OUTPUT_VOLUME: f32 = 100.0;
const CARRIERS: usize = 1 + MAX_STREAMS;

/// Carrier phase a data stream is multiplied with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierPhase {
    Cos,
    Sin,
    NegCos,
    NegSin,
}

impl CarrierPhase {
    /// Phase used for `stream`. Additional RDS2 streams are shifted by a
    /// further 90 degrees each when `quadrature` is set.
    pub fn for_stream(stream: usize, quadrature: bool) -> Self {
        if !quadrature {
            return CarrierPhase::Cos;
        }
        match stream % 4 {
            0 => CarrierPhase::Cos,
            1 => CarrierPhase::Sin,
            2 => CarrierPhase::NegCos,
            _ => CarrierPhase::NegSin,
        }
    }

    #[inline]
    fn sample(self, osc: &Oscillator) -> f32 {
        match self {
            CarrierPhase::Cos => osc.cos(),
            CarrierPhase::Sin => osc.sin(),
            CarrierPhase::NegCos => -osc.cos(),
            CarrierPhase::NegSin => -osc.sin(),
        }
    }
}

/// Carrier and output levels, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpxLevels {
    /// 19 kHz pilot
    pub pilot: f32,
    /// 57 kHz RDS
    pub rds: f32,
    /// 66.5 / 71.25 / 76 kHz RDS2 carriers
    pub rds2: [f32; 3],
    /// Global output level applied after clipping
    pub output: f32,
}

impl Default for MpxLevels {
    fn default() -> Self {
        Self {
            pilot: 9.0,
            rds: 9.0,
            rds2: [9.333_333, 9.5, 9.666_667],
            output: 100.0,
        }
    }
}

impl MpxLevels {
    /// Levels in carrier-index order: pilot, RDS, then the RDS2 carriers.
    pub fn carriers(&self) -> [f32; CARRIERS] {
        [self.pilot, self.rds, self.rds2[0], self.rds2[1], self.rds2[2]]
    }
}

#[derive(Debug, Clone)]
struct Subcarrier {
    osc: Oscillator,
    phase: CarrierPhase,
    modulator: Modulator,
}

/// Owns every oscillator and modulator of the output signal.
#[derive(Debug, Clone)]
pub struct Mpx {
    pilot: Oscillator,
    subcarriers: Vec<Subcarrier>,
    /// Linear gains in carrier-index order.
    gains: [f32; CARRIERS],
    output_gain: f32,
}

impl Mpx {
    /// Build the oscillators and `streams` modulators (0 gives a pilot-only
    /// signal, 1 legacy RDS, up to 4 with RDS2).
    pub fn new(
        sample_rate: u32,
        streams: usize,
        quadrature: bool,
        levels: &MpxLevels,
    ) -> Result<Self, DspError> {
        if streams > MAX_STREAMS {
            return Err(DspError::TooManyStreams(streams, MAX_STREAMS));
        }
        let waveform = Arc::new(BiphaseWaveform::new(sample_rate)?);
        let pilot = Oscillator::new(sample_rate, PILOT_HZ)?;

        let mut subcarriers = Vec::with_capacity(streams);
        for stream in 0..streams {
            let freq = if stream == 0 {
                RDS_CARRIER_HZ
            } else {
                RDS2_CARRIERS_HZ[stream - 1]
            };
            let osc = Oscillator::new(sample_rate, freq)?;
            debug!(
                "stream {}: {} Hz carrier, {} sample period",
                stream,
                freq,
                osc.period()
            );
            subcarriers.push(Subcarrier {
                osc,
                phase: CarrierPhase::for_stream(stream, quadrature),
                modulator: Modulator::new(stream, Arc::clone(&waveform)),
            });
        }

        let mut mpx = Self {
            pilot,
            subcarriers,
            gains: [0.0; CARRIERS],
            output_gain: 1.0,
        };
        for (carrier, level) in levels.carriers().into_iter().enumerate() {
            mpx.set_carrier_volume(carrier, level)?;
        }
        mpx.set_output_volume(levels.output);
        Ok(mpx)
    }

    /// Set a carrier level in percent, clamped to 0..=15.
    pub fn set_carrier_volume(&mut self, carrier: usize, percent: f32) -> Result<(), DspError> {
        let gain = self
            .gains
            .get_mut(carrier)
            .ok_or(DspError::NoSuchCarrier(carrier))?;
        *gain = percent.max(0.0).min(MAX_CARRIER_VOLUME) / 100.0;
        Ok(())
    }

    /// Set the global output level in percent, clamped to 0..=100.
    pub fn set_output_volume(&mut self, percent: f32) {
        self.output_gain = percent.max(0.0).min(MAX_OUTPUT_VOLUME) / 100.0;
    }

    pub fn carrier_volume(&self, carrier: usize) -> Option<f32> {
        self.gains.get(carrier).map(|g| g * 100.0)
    }

    pub fn output_volume(&self) -> f32 {
        self.output_gain * 100.0
    }

    pub fn stream_count(&self) -> usize {
        self.subcarriers.len()
    }

    /// Fill up to `count` interleaved stereo frames of `out`; returns the
    /// number of frames written.
    pub fn next_frame_block<S: GroupSource + ?Sized>(
        &mut self,
        source: &mut S,
        out: &mut [f32],
        count: usize,
    ) -> usize {
        let mut written = 0;
        for frame in out.chunks_exact_mut(2).take(count) {
            let mut sum = self.pilot.cos() * self.gains[0];
            self.pilot.advance();

            for (idx, sub) in self.subcarriers.iter_mut().enumerate() {
                let data = sub.modulator.next_sample(source);
                sum += sub.phase.sample(&sub.osc) * data * self.gains[idx + 1];
                sub.osc.advance();
            }

            let sample = clip_and_scale(sum, self.output_gain);
            frame[0] = sample;
            frame[1] = sample;
            written += 1;
        }
        written
    }
}

/// Hard-clip the composite to [-1, 1] and apply the output gain.
#[inline]
pub fn clip_and_scale(sum: f32, output_gain: f32) -> f32 {
    sum.clamp(-1.0, 1.0) * output_gain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::GroupBits;

    struct Alternating;

    impl GroupSource for Alternating {
        fn next_group(&mut self, _stream: usize) -> GroupBits {
            GroupBits::from_raw(0xAAAA_AAAA_AAAA_AAAA_AAAA_AAAA_AA)
        }
    }

    #[test]
    fn clipping_saturates_at_unity() {
        assert_eq!(clip_and_scale(3.7, 1.0), 1.0);
        assert_eq!(clip_and_scale(-12.0, 1.0), -1.0);
        assert_eq!(clip_and_scale(f32::MAX, 1.0), 1.0);
        assert_eq!(clip_and_scale(f32::NEG_INFINITY, 1.0), -1.0);
        assert_eq!(clip_and_scale(1.5, 0.5), 0.5);
        assert_eq!(clip_and_scale(0.4, 0.5), 0.2);
    }

    #[test]
    fn pilot_only_signal_follows_cosine() {
        let levels = MpxLevels::default();
        let mut mpx = Mpx::new(190_000, 0, true, &levels).unwrap();
        let mut out = vec![0.0f32; 40];
        assert_eq!(mpx.next_frame_block(&mut Alternating, &mut out, 20), 20);
        assert!((out[0] - 0.09).abs() < 1e-6);
        for frame in 0..10 {
            assert_eq!(out[frame * 2], out[frame * 2 + 1]);
            assert_eq!(out[frame * 2], out[(frame + 10) * 2]);
        }
    }

    #[test]
    fn levels_are_clamped() {
        let levels = MpxLevels::default();
        let mut mpx = Mpx::new(190_000, 1, true, &levels).unwrap();
        mpx.set_carrier_volume(1, 40.0).unwrap();
        assert_eq!(mpx.carrier_volume(1), Some(15.0));
        mpx.set_carrier_volume(0, -3.0).unwrap();
        assert_eq!(mpx.carrier_volume(0), Some(0.0));
        assert_eq!(
            mpx.set_carrier_volume(5, 1.0),
            Err(DspError::NoSuchCarrier(5))
        );
        mpx.set_output_volume(150.0);
        assert_eq!(mpx.output_volume(), 100.0);
        mpx.set_output_volume(-1.0);
        assert_eq!(mpx.output_volume(), 0.0);
    }

    #[test]
    fn rds2_streams_stay_within_unity() {
        let levels = MpxLevels::default();
        let mut mpx = Mpx::new(190_000, 4, true, &levels).unwrap();
        assert_eq!(mpx.stream_count(), 4);
        let mut out = vec![0.0f32; 2 * 19_000];
        let frames = mpx.next_frame_block(&mut Alternating, &mut out, 19_000);
        assert_eq!(frames, 19_000);
        assert!(out.iter().all(|s| s.abs() <= 1.0));
        assert!(out.chunks_exact(2).all(|f| f[0] == f[1]));
    }

    #[test]
    fn frame_count_limited_by_buffer() {
        let mut mpx = Mpx::new(190_000, 1, false, &MpxLevels::default()).unwrap();
        let mut out = vec![0.0f32; 7];
        assert_eq!(mpx.next_frame_block(&mut Alternating, &mut out, 10), 3);
    }

    #[test]
    fn too_many_streams_rejected() {
        assert_eq!(
            Mpx::new(190_000, 5, true, &MpxLevels::default()).unwrap_err(),
            DspError::TooManyStreams(5, MAX_STREAMS)
        );
    }

    #[test]
    fn quadrature_phases() {
        assert_eq!(CarrierPhase::for_stream(0, true), CarrierPhase::Cos);
        assert_eq!(CarrierPhase::for_stream(3, true), CarrierPhase::NegSin);
        assert_eq!(CarrierPhase::for_stream(3, false), CarrierPhase::Cos);
    }
}
