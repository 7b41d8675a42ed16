// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Group scheduling for one data stream.
//!
//! Each call to [`Scheduler::next_content`] picks exactly one group:
//!
//! 1. clock time (4A) when enabled and the minute has changed,
//! 2. otherwise the first lower-priority group whose round-robin counter
//!    reaches its threshold (3A, 10A, RT+, then eRT, eRT+ and 15A on RDS2),
//! 3. otherwise strict 0A/2A alternation, with a freshly swapped RadioText
//!    sent back to back before the alternation resumes.

use crate::af::AfList;
use crate::clock::{ClockTime, WallClock};
use crate::encoder::EncoderVariant;
use crate::group::{assemble, BlockQuad, GroupContent, GroupHeader, GroupType, GroupVersion};
use crate::oda::{OdaRegistry, AID_ERT, AID_ERT_PLUS, AID_RT_PLUS};
use crate::publish::TextCursor;
use crate::state::RdsState;
use crate::text::{EnhancedText, LongPs, PsText, PtynText, RadioText};

const ODA_EVERY: u8 = 20;
const PTYN_EVERY: u8 = 10;
const RTPLUS_EVERY: u8 = 30;
const ERT_EVERY: u8 = 3;
const ERTPLUS_EVERY: u8 = 30;
const LPS_EVERY: u8 = 15;

const PS_SEGMENTS: usize = 4;
const PTYN_SEGMENTS: usize = 2;

/// What a scheduler's groups are used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamRole {
    /// The 57 kHz stream; the only one that sends clock time.
    Primary,
    /// An RDS2 stream tunneling the same content (block 0 zeroed).
    Tunnel,
}

/// Round-robin counter that fires every `every` ticks.
#[derive(Debug, Clone, Copy, Default)]
struct Turn(u8);

impl Turn {
    fn tick(&mut self, every: u8) -> bool {
        self.0 += 1;
        if self.0 >= every {
            self.0 = 0;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    role: StreamRole,
    variant: EncoderVariant,
    basic_tuning: GroupVersion,

    ps: TextCursor<PsText>,
    rt: TextCursor<RadioText>,
    ptyn: TextCursor<PtynText>,
    lps: TextCursor<LongPs>,
    ert: TextCursor<EnhancedText>,

    rt_ab: bool,
    rt_turn: bool,
    rt_burst: usize,
    ert_burst: usize,

    af: AfList,
    af_cursor: usize,
    af_seen: u32,
    oda_cursor: usize,

    oda_turn: Turn,
    ptyn_turn: Turn,
    rtplus_turn: Turn,
    ert_turn: Turn,
    ertplus_turn: Turn,
    lps_turn: Turn,

    last_ct_minute: Option<i64>,
}

impl Scheduler {
    /// Start with the content currently published in `state`. The initial
    /// RadioText is not burst.
    pub fn new(role: StreamRole, variant: EncoderVariant, state: &RdsState) -> Self {
        Self {
            role,
            variant,
            basic_tuning: GroupVersion::A,
            ps: TextCursor::new(&state.ps),
            rt: TextCursor::new(&state.rt),
            ptyn: TextCursor::new(&state.ptyn),
            lps: TextCursor::new(&state.lps),
            ert: TextCursor::new(&state.ert),
            rt_ab: false,
            rt_turn: false,
            rt_burst: 0,
            ert_burst: 0,
            af: *state.af.value(),
            af_cursor: 0,
            af_seen: state.af.version(),
            oda_cursor: 0,
            oda_turn: Turn::default(),
            ptyn_turn: Turn::default(),
            rtplus_turn: Turn::default(),
            ert_turn: Turn::default(),
            ertplus_turn: Turn::default(),
            lps_turn: Turn::default(),
            last_ct_minute: None,
        }
    }

    /// Send PS in 0B instead of 0A groups (no AF, PI repeated in block 2).
    pub fn with_basic_tuning(mut self, version: GroupVersion) -> Self {
        self.basic_tuning = version;
        self
    }

    pub fn role(&self) -> StreamRole {
        self.role
    }

    pub fn rt_ab(&self) -> bool {
        self.rt_ab
    }

    /// Produce the complete block quad for the next group.
    pub fn next_group(
        &mut self,
        state: &RdsState,
        odas: &OdaRegistry,
        clock: &dyn WallClock,
    ) -> BlockQuad {
        let content = self.next_content(state, odas, clock);
        let header = GroupHeader {
            pi: state.pi,
            tp: state.tp,
            pty: state.pty,
            tunnel: self.role == StreamRole::Tunnel,
        };
        assemble(header, &content)
    }

    /// Choose the next group and advance every cursor it touches.
    pub fn next_content(
        &mut self,
        state: &RdsState,
        odas: &OdaRegistry,
        clock: &dyn WallClock,
    ) -> GroupContent {
        if let Some(ct) = self.clock_time(state, clock) {
            return GroupContent::ClockTime(ct);
        }
        if let Some(content) = self.other_group(state, odas) {
            return content;
        }
        if self.rt_turn {
            let content = self.radio_text(state);
            if self.rt_burst == 0 {
                self.rt_turn = false;
            }
            content
        } else {
            self.rt_turn = true;
            self.basic_tuning(state)
        }
    }

    fn clock_time(&mut self, state: &RdsState, clock: &dyn WallClock) -> Option<ClockTime> {
        if self.role != StreamRole::Primary || !state.ct {
            return None;
        }
        let reading = clock.now();
        let stamp = reading.minute_stamp();
        if self.last_ct_minute == Some(stamp) {
            return None;
        }
        self.last_ct_minute = Some(stamp);
        Some(ClockTime::from_reading(&reading))
    }

    fn other_group(&mut self, state: &RdsState, odas: &OdaRegistry) -> Option<GroupContent> {
        if !odas.is_empty() && self.oda_turn.tick(ODA_EVERY) {
            if let Some((entry, next)) = odas.announcement(self.oda_cursor) {
                self.oda_cursor = next;
                return Some(GroupContent::OdaAnnouncement {
                    target: entry.group,
                    aid: entry.aid,
                    message: entry.message,
                });
            }
        }

        if !state.ptyn.value().is_empty() && self.ptyn_turn.tick(PTYN_EVERY) {
            return Some(self.program_type_name(state));
        }

        if self.rtplus_turn.tick(RTPLUS_EVERY) {
            return Some(GroupContent::Tagging {
                group: odas.group_for(AID_RT_PLUS).unwrap_or(GroupType::RT_PLUS),
                running: state.rtplus.running,
                toggle: state.rtplus.toggle,
                tags: state.rtplus.tags,
            });
        }

        if self.variant != EncoderVariant::Rds2 {
            return None;
        }

        if !state.ert.value().is_empty() {
            let due = self.ert_turn.tick(ERT_EVERY);
            if due || self.ert_burst > 0 {
                let group = odas.group_for(AID_ERT).unwrap_or(GroupType::ERT);
                return Some(self.enhanced_text(state, group));
            }
        }

        if self.ertplus_turn.tick(ERTPLUS_EVERY) {
            return Some(GroupContent::Tagging {
                group: odas.group_for(AID_ERT_PLUS).unwrap_or(GroupType::ERT_PLUS),
                running: state.ertplus.running,
                toggle: state.ertplus.toggle,
                tags: state.ertplus.tags,
            });
        }

        if !state.lps.value().is_empty() && self.lps_turn.tick(LPS_EVERY) {
            return Some(self.long_ps(state));
        }

        None
    }

    fn basic_tuning(&mut self, state: &RdsState) -> GroupContent {
        self.ps.refresh(&state.ps);
        let segment = self.ps.segment();

        let af = if self.basic_tuning == GroupVersion::A {
            // A new list goes out once the current cycle has finished.
            if self.af_cursor == 0 && self.af_seen != state.af.version() {
                self.af = *state.af.value();
                self.af_seen = state.af.version();
            }
            let (code, next) = self.af.code_pair(self.af_cursor);
            self.af_cursor = next;
            code
        } else {
            0
        };

        let content = GroupContent::BasicTuning {
            version: self.basic_tuning,
            ta: state.ta,
            ms: state.ms,
            di_bit: (state.di >> (3 - segment)) & 1 == 1,
            segment: segment as u8,
            af,
            chars: self.ps.active().pair(segment),
        };
        self.ps.advance(PS_SEGMENTS);
        content
    }

    fn radio_text(&mut self, state: &RdsState) -> GroupContent {
        if self.rt.refresh(&state.rt) {
            self.rt_ab = !self.rt_ab;
            self.rt_burst = self.rt.active().segments();
        }
        let segment = self.rt.segment();
        let content = GroupContent::RadioText {
            ab: self.rt_ab,
            segment: segment as u8,
            chars: self.rt.active().quad(segment),
        };
        self.rt.advance(self.rt.active().segments());
        self.rt_burst = self.rt_burst.saturating_sub(1);
        content
    }

    fn program_type_name(&mut self, state: &RdsState) -> GroupContent {
        self.ptyn.refresh(&state.ptyn);
        let segment = self.ptyn.segment();
        let content = GroupContent::ProgramTypeName {
            segment: segment as u8,
            chars: self.ptyn.active().quad(segment),
        };
        self.ptyn.advance(PTYN_SEGMENTS);
        content
    }

    fn enhanced_text(&mut self, state: &RdsState, group: GroupType) -> GroupContent {
        self.ert_burst = self.ert_burst.saturating_sub(1);
        if self.ert.refresh(&state.ert) {
            self.ert_burst = self.ert.active().segments().saturating_sub(1);
        }
        let segment = self.ert.segment();
        let content = GroupContent::EnhancedText {
            group,
            segment: segment as u8,
            chars: self.ert.active().quad(segment),
        };
        self.ert.advance(self.ert.active().segments());
        content
    }

    fn long_ps(&mut self, state: &RdsState) -> GroupContent {
        self.lps.refresh(&state.lps);
        let segment = self.lps.segment();
        let content = GroupContent::LongPs {
            segment: segment as u8,
            chars: self.lps.active().quad(segment),
        };
        self.lps.advance(self.lps.active().segments());
        content
    }
}
