// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Differential biphase modulator for one RDS/RDS2 data stream.

use std::sync::Arc;

use crate::bits::{GroupBits, BITS_PER_GROUP};
use crate::ring::SampleRing;
use crate::waveform::BiphaseWaveform;

/// Supplier of coded groups, one call per 104 transmitted bits.
pub trait GroupSource {
    /// Next coded group for `stream` (0 is the legacy RDS stream).
    fn next_group(&mut self, stream: usize) -> GroupBits;
}

#[derive(Debug, Clone)]
pub struct Modulator {
    stream: usize,
    waveform: Arc<BiphaseWaveform>,
    ring: SampleRing,
    bits: GroupBits,
    bit_pos: usize,
    sample_count: usize,
    output_bit: bool,
}

impl Modulator {
    pub fn new(stream: usize, waveform: Arc<BiphaseWaveform>) -> Self {
        let samples_per_bit = waveform.samples_per_bit();
        let ring = SampleRing::new(samples_per_bit + waveform.filter_size());
        Self {
            stream,
            waveform,
            ring,
            bits: GroupBits::default(),
            // Start on a group boundary so the first sample pulls a group.
            bit_pos: BITS_PER_GROUP,
            sample_count: samples_per_bit,
            output_bit: false,
        }
    }

    /// Produce one baseband sample, pulling a new bit every bit period and a
    /// new group from `source` every 104 bits.
    pub fn next_sample<S: GroupSource + ?Sized>(&mut self, source: &mut S) -> f32 {
        let samples_per_bit = self.waveform.samples_per_bit();
        if self.sample_count == samples_per_bit {
            if self.bit_pos == BITS_PER_GROUP {
                self.bits = source.next_group(self.stream);
                self.bit_pos = 0;
            }
            let bit = self.bits.bit(self.bit_pos);
            self.bit_pos += 1;

            self.output_bit ^= bit;
            self.ring.accumulate(self.waveform.shape(self.output_bit));
            self.ring.advance_write(samples_per_bit);
            self.sample_count = 0;
        }
        self.sample_count += 1;
        self.ring.pop()
    }

    pub fn stream(&self) -> usize {
        self.stream
    }

    /// Current differentially encoded output bit.
    pub fn output_bit(&self) -> bool {
        self.output_bit
    }

    /// Index of the next bit to be taken from the current group.
    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        group: GroupBits,
        calls: Vec<usize>,
    }

    impl GroupSource for Fixed {
        fn next_group(&mut self, stream: usize) -> GroupBits {
            self.calls.push(stream);
            self.group
        }
    }

    fn modulator(stream: usize) -> Modulator {
        Modulator::new(stream, Arc::new(BiphaseWaveform::new(190_000).unwrap()))
    }

    #[test]
    fn pulls_one_group_per_104_bits() {
        let mut source = Fixed {
            group: GroupBits::default(),
            calls: Vec::new(),
        };
        let mut m = modulator(2);
        m.next_sample(&mut source);
        assert_eq!(source.calls, vec![2]);
        for _ in 1..BITS_PER_GROUP * 160 {
            m.next_sample(&mut source);
        }
        assert_eq!(source.calls.len(), 1);
        m.next_sample(&mut source);
        assert_eq!(source.calls.len(), 2);
    }

    #[test]
    fn ones_toggle_output_and_zeros_hold_it() {
        let mut ones = Fixed {
            group: GroupBits::from_raw(u128::MAX),
            calls: Vec::new(),
        };
        let mut m = modulator(0);
        let mut history = Vec::new();
        for _ in 0..8 {
            m.next_sample(&mut ones);
            history.push(m.output_bit());
            for _ in 1..160 {
                m.next_sample(&mut ones);
            }
        }
        assert_eq!(
            history,
            vec![true, false, true, false, true, false, true, false]
        );

        let mut zeros = Fixed {
            group: GroupBits::default(),
            calls: Vec::new(),
        };
        let mut m = modulator(0);
        for _ in 0..8 * 160 {
            m.next_sample(&mut zeros);
            assert!(!m.output_bit());
        }
    }

    #[test]
    fn output_is_bounded_and_nonzero() {
        let mut source = Fixed {
            group: GroupBits::from_raw(0x5A5A_5A5A_5A5A_5A5A_5A5A_5A5A_5A),
            calls: Vec::new(),
        };
        let mut m = modulator(0);
        let samples: Vec<f32> = (0..BITS_PER_GROUP * 160 * 2)
            .map(|_| m.next_sample(&mut source))
            .collect();
        let peak = samples.iter().fold(0.0f32, |p, s| p.max(s.abs()));
        assert!(peak > 0.5);
        assert!(peak < 2.5);
    }
}
