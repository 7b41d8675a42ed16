// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Versioned content hand-off between the setters and the schedulers.
//!
//! Setters replace a [`Published`] value and bump its version. Each
//! scheduler keeps its own transmit copy in a [`TextCursor`] and only picks
//! up a new version once the message it is sending has wrapped, so a
//! receiver never sees two messages mixed together.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Published<T> {
    value: T,
    version: u32,
}

impl<T: Clone> Published<T> {
    pub fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    pub fn publish(&mut self, value: T) {
        self.value = value;
        self.version = self.version.wrapping_add(1);
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u32 {
        self.version
    }
}

/// Transmit copy of one published message plus the segment about to go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCursor<T> {
    active: T,
    seen: u32,
    segment: usize,
}

impl<T: Clone> TextCursor<T> {
    pub fn new(published: &Published<T>) -> Self {
        Self {
            active: published.value().clone(),
            seen: published.version(),
            segment: 0,
        }
    }

    /// Adopt the latest published value if the cursor sits on a message
    /// boundary. Returns `true` when a swap happened.
    pub fn refresh(&mut self, published: &Published<T>) -> bool {
        if self.segment != 0 || self.seen == published.version() {
            return false;
        }
        self.active = published.value().clone();
        self.seen = published.version();
        true
    }

    pub fn active(&self) -> &T {
        &self.active
    }

    pub fn segment(&self) -> usize {
        self.segment
    }

    /// Step to the next segment, wrapping after `segments`.
    pub fn advance(&mut self, segments: usize) {
        self.segment += 1;
        if self.segment >= segments.max(1) {
            self.segment = 0;
        }
    }
}
