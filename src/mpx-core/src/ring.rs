// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

/// Circular overlap-add accumulator.
///
/// Pulse shapes are summed in at the write cursor; samples are drained one
/// at a time at the read cursor, which zeroes the slot behind it.
#[derive(Debug, Clone)]
pub struct SampleRing {
    buf: Vec<f32>,
    read: usize,
    write: usize,
}

impl SampleRing {
    pub fn new(len: usize) -> Self {
        Self {
            buf: vec![0.0; len.max(1)],
            read: 0,
            write: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    fn wrap(&self, index: usize) -> usize {
        index % self.buf.len()
    }

    /// Add `shape` starting at the write cursor, wrapping around the end.
    pub fn accumulate(&mut self, shape: &[f32]) {
        let mut idx = self.write;
        for &s in shape {
            self.buf[idx] += s;
            idx = self.wrap(idx + 1);
        }
    }

    pub fn advance_write(&mut self, count: usize) {
        self.write = self.wrap(self.write + count);
    }

    /// Take the sample under the read cursor and clear its slot.
    #[inline]
    pub fn pop(&mut self) -> f32 {
        let sample = std::mem::take(&mut self.buf[self.read]);
        self.read = self.wrap(self.read + 1);
        sample
    }

    pub fn read_index(&self) -> usize {
        self.read
    }

    pub fn write_index(&self) -> usize {
        self.write
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_shapes_are_summed() {
        let mut ring = SampleRing::new(6);
        ring.accumulate(&[1.0, 1.0, 1.0, 1.0]);
        ring.advance_write(2);
        ring.accumulate(&[0.5, 0.5, 0.5, 0.5]);
        let out: Vec<f32> = (0..6).map(|_| ring.pop()).collect();
        assert_eq!(out, vec![1.0, 1.0, 1.5, 1.5, 0.5, 0.5]);
    }

    #[test]
    fn pop_clears_slot_and_cursors_wrap() {
        let mut ring = SampleRing::new(4);
        ring.advance_write(3);
        ring.accumulate(&[2.0, 3.0]);
        assert_eq!(ring.write_index(), 3);
        assert_eq!(ring.pop(), 3.0);
        for _ in 0..3 {
            ring.pop();
        }
        assert_eq!(ring.read_index(), 0);
        assert_eq!(ring.pop(), 0.0);
        ring.advance_write(2);
        assert_eq!(ring.write_index(), 1);
    }
}
