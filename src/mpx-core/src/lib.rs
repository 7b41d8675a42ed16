// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Signal-synthesis building blocks for the MPX generator.
//!
//! Everything in here is allocation-free once constructed, so the types can
//! live on the real-time generation thread.

pub mod bits;
pub mod error;
pub mod mixer;
pub mod modulator;
pub mod osc;
pub mod ring;
pub mod util;
pub mod waveform;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use bits::{GroupBits, BITS_PER_BLOCK, BITS_PER_GROUP, BLOCKS_PER_GROUP};
pub use error::DspError;
pub use mixer::{CarrierPhase, Mpx, MpxLevels, MAX_CARRIER_VOLUME};
pub use modulator::{GroupSource, Modulator};
pub use osc::Oscillator;
pub use util::normalize_name;
pub use waveform::BiphaseWaveform;

/// Reference internal MPX sample rate in Hz.
pub const MPX_SAMPLE_RATE: u32 = 190_000;
/// RDS data rate in bits per second.
pub const RDS_BIT_RATE: f64 = 1_187.5;

/// Pilot tone frequency.
pub const PILOT_HZ: f64 = 19_000.0;
/// Legacy RDS subcarrier frequency.
pub const RDS_CARRIER_HZ: f64 = 57_000.0;
/// Additional RDS2 subcarriers, in stream order.
pub const RDS2_CARRIERS_HZ: [f64; 3] = [66_500.0, 71_250.0, 76_000.0];
/// Maximum number of RDS/RDS2 data streams.
pub const MAX_STREAMS: usize = 4;
