// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Interleaved stereo PCM sink for the generated MPX signal.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Path that selects standard output.
pub const STDOUT_PATH: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// 32-bit IEEE float, little endian
    #[default]
    F32,
    /// 16-bit signed integer, little endian
    S16,
}

impl SampleFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::F32 => 4,
            SampleFormat::S16 => 2,
        }
    }
}

/// Convert one sample to 16-bit PCM, rounding and saturating.
pub fn f32_to_s16(sample: f32) -> i16 {
    (sample * f32::from(i16::MAX))
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

/// Writes blocks of interleaved samples in the configured format.
///
/// The byte buffer is sized for one block up front and reused.
pub struct PcmSink {
    writer: Box<dyn Write + Send>,
    format: SampleFormat,
    bytes: Vec<u8>,
}

impl PcmSink {
    pub fn new(writer: Box<dyn Write + Send>, format: SampleFormat, frames_per_block: usize) -> Self {
        Self {
            writer,
            format,
            bytes: Vec::with_capacity(frames_per_block * 2 * format.bytes_per_sample()),
        }
    }

    /// Open `path`, or stdout for `-`.
    pub fn open(path: &str, format: SampleFormat, frames_per_block: usize) -> io::Result<Self> {
        let writer: Box<dyn Write + Send> = if path == STDOUT_PATH {
            Box::new(BufWriter::new(io::stdout()))
        } else {
            Box::new(BufWriter::new(File::create(Path::new(path))?))
        };
        Ok(Self::new(writer, format, frames_per_block))
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Write interleaved samples (two per frame).
    pub fn write_samples(&mut self, samples: &[f32]) -> io::Result<()> {
        self.bytes.clear();
        match self.format {
            SampleFormat::F32 => {
                for s in samples {
                    self.bytes.extend_from_slice(&s.to_le_bytes());
                }
            }
            SampleFormat::S16 => {
                for s in samples {
                    self.bytes.extend_from_slice(&f32_to_s16(*s).to_le_bytes());
                }
            }
        }
        self.writer.write_all(&self.bytes)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
