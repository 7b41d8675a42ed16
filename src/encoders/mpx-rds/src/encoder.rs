// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use mpx_core::{GroupBits, GroupSource, MAX_STREAMS};

use crate::af::{AfList, Region};
use crate::checkword::{encode, CodingMode};
use crate::clock::{SystemClock, WallClock};
use crate::error::RdsError;
use crate::group::{BlockQuad, GroupType, GroupVersion};
use crate::oda::{OdaRegistry, AID_ERT, AID_ERT_PLUS, AID_RT_PLUS};
use crate::rft::RftSender;
use crate::rtplus::tags_from_fields;
use crate::scheduler::{Scheduler, StreamRole};
use crate::snapshot::RdsSnapshot;
use crate::state::{RdsCommand, RdsState};
use crate::text::{EnhancedText, LongPs, PsText, PtynText, RadioText};

/// Which group repertoire the schedulers use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderVariant {
    /// Legacy RDS: 0A, 2A, 3A, 4A, 10A and RT+.
    #[default]
    Rds,
    /// Adds eRT, eRT+ and Long PS.
    Rds2,
}

/// Initial station content.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderParams {
    pub region: Region,
    pub variant: EncoderVariant,
    pub basic_tuning: GroupVersion,
    pub pi: u16,
    pub ps: String,
    pub rt: String,
    pub pty: u8,
    pub ptyn: String,
    pub tp: bool,
    pub ta: bool,
    pub ms: bool,
    pub di: u8,
    pub clock_time: bool,
    /// Frequencies in MHz (FM) or kHz (LF/MF).
    pub af: Vec<f32>,
    pub rtplus: [u8; 6],
    pub lps: String,
    pub ert: String,
    pub ertplus: [u8; 6],
}

impl Default for EncoderParams {
    fn default() -> Self {
        Self {
            region: Region::Europe,
            variant: EncoderVariant::Rds,
            basic_tuning: GroupVersion::A,
            pi: 0x1000,
            ps: String::new(),
            rt: String::new(),
            pty: 0,
            ptyn: String::new(),
            tp: false,
            ta: false,
            ms: true,
            di: 1,
            clock_time: false,
            af: Vec::new(),
            rtplus: [0; 6],
            lps: String::new(),
            ert: String::new(),
            ertplus: [0; 6],
        }
    }
}

/// An additional RDS2 data stream.
#[derive(Debug)]
pub enum Rds2Stream {
    /// Tunnels the station content with its own scheduler.
    Tunnel(Scheduler),
    /// Carries a file in RFT groups.
    FileTransfer(RftSender),
}

/// Encoder context: station content, ODA registry, clock and the
/// schedulers of every data stream.
pub struct RdsEncoder {
    state: RdsState,
    odas: OdaRegistry,
    clock: Box<dyn WallClock>,
    basic_tuning: GroupVersion,
    variant: EncoderVariant,
    primary: Scheduler,
    rds2: Vec<Rds2Stream>,
}

impl RdsEncoder {
    pub fn new(params: &EncoderParams) -> Result<Self, RdsError> {
        Self::with_clock(params, Box::new(SystemClock))
    }

    pub fn with_clock(params: &EncoderParams, clock: Box<dyn WallClock>) -> Result<Self, RdsError> {
        let state = initial_state(params)?;

        let mut odas = OdaRegistry::new();
        odas.register(GroupType::RT_PLUS, AID_RT_PLUS, 0)?;
        if params.variant == EncoderVariant::Rds2 {
            odas.register(GroupType::ERT, AID_ERT, 0)?;
            odas.register(GroupType::ERT_PLUS, AID_ERT_PLUS, 0)?;
        }

        let primary = Scheduler::new(StreamRole::Primary, params.variant, &state)
            .with_basic_tuning(params.basic_tuning);

        info!(
            "RDS encoder: PI {:04X}, PS \"{}\", PTY {}, {}",
            state.pi,
            state.ps.value(),
            state.pty,
            state.af.value()
        );

        Ok(Self {
            state,
            odas,
            clock,
            basic_tuning: params.basic_tuning,
            variant: params.variant,
            primary,
            rds2: Vec::new(),
        })
    }

    /// Add a stream that tunnels the station content. Returns its index.
    pub fn add_tunnel(&mut self) -> Result<usize, RdsError> {
        let scheduler = Scheduler::new(StreamRole::Tunnel, self.variant, &self.state)
            .with_basic_tuning(self.basic_tuning);
        self.add_rds2_stream(Rds2Stream::Tunnel(scheduler))
    }

    /// Add a stream carrying `sender`'s file. Returns its index.
    pub fn add_file_transfer(&mut self, sender: RftSender) -> Result<usize, RdsError> {
        self.add_rds2_stream(Rds2Stream::FileTransfer(sender))
    }

    pub fn add_rds2_stream(&mut self, stream: Rds2Stream) -> Result<usize, RdsError> {
        if self.rds2.len() + 1 >= MAX_STREAMS {
            return Err(RdsError::TooManyStreams(MAX_STREAMS - 1));
        }
        self.rds2.push(stream);
        let index = self.rds2.len();
        debug!("RDS2 stream {} added", index);
        Ok(index)
    }

    /// Number of data streams including the legacy one.
    pub fn stream_count(&self) -> usize {
        1 + self.rds2.len()
    }

    pub fn state(&self) -> &RdsState {
        &self.state
    }

    pub fn odas(&self) -> &OdaRegistry {
        &self.odas
    }

    pub fn snapshot(&self) -> RdsSnapshot {
        RdsSnapshot::from_state(&self.state)
    }

    /// Apply one validated change; the schedulers pick it up at their next
    /// message boundary.
    pub fn apply(&mut self, cmd: RdsCommand) -> Result<(), RdsError> {
        self.state.apply(cmd)
    }

    pub fn set_pi(&mut self, pi: u16) {
        self.state.pi = pi;
    }

    pub fn set_ps(&mut self, ps: &str) -> Result<(), RdsError> {
        self.apply(RdsCommand::SetPs(PsText::new(ps)?))
    }

    pub fn set_rt(&mut self, rt: &str) -> Result<(), RdsError> {
        self.apply(RdsCommand::SetRt(RadioText::new(rt)?))
    }

    pub fn set_pty(&mut self, pty: u8) -> Result<(), RdsError> {
        self.apply(RdsCommand::SetPty(pty))
    }

    /// An empty name stops 10A groups.
    pub fn set_ptyn(&mut self, ptyn: &str) -> Result<(), RdsError> {
        self.apply(RdsCommand::SetPtyn(PtynText::new(ptyn)?))
    }

    pub fn set_ta(&mut self, ta: bool) {
        self.state.ta = ta;
    }

    pub fn set_tp(&mut self, tp: bool) {
        self.state.tp = tp;
    }

    pub fn set_ms(&mut self, ms: bool) {
        self.state.ms = ms;
    }

    pub fn set_di(&mut self, di: u8) -> Result<(), RdsError> {
        self.apply(RdsCommand::SetDi(di))
    }

    pub fn set_clock_time(&mut self, enabled: bool) {
        self.state.ct = enabled;
    }

    pub fn add_af(&mut self, freq: f32) -> Result<(), RdsError> {
        self.apply(RdsCommand::AddAf(freq))
    }

    pub fn clear_af(&mut self) {
        self.state.af.publish(AfList::new(self.state.region));
    }

    pub fn set_rtplus_tags(&mut self, fields: [u8; 6]) -> Result<(), RdsError> {
        self.apply(RdsCommand::SetRtPlusTags(tags_from_fields(fields)))
    }

    pub fn set_rtplus_flags(&mut self, running: bool, toggle: bool) {
        self.state.rtplus.running = running;
        self.state.rtplus.toggle = toggle;
    }

    pub fn set_lps(&mut self, lps: &str) -> Result<(), RdsError> {
        self.apply(RdsCommand::SetLps(LongPs::new(lps)?))
    }

    pub fn set_ert(&mut self, ert: &str) -> Result<(), RdsError> {
        self.apply(RdsCommand::SetErt(EnhancedText::new(ert)?))
    }

    pub fn set_ertplus_tags(&mut self, fields: [u8; 6]) -> Result<(), RdsError> {
        self.apply(RdsCommand::SetErtPlusTags(tags_from_fields(fields)))
    }

    pub fn set_ertplus_flags(&mut self, running: bool, toggle: bool) {
        self.state.ertplus.running = running;
        self.state.ertplus.toggle = toggle;
    }

    /// Next uncoded group of the legacy stream.
    pub fn next_blocks(&mut self) -> BlockQuad {
        self.primary
            .next_group(&self.state, &self.odas, self.clock.as_ref())
    }
}

impl GroupSource for RdsEncoder {
    fn next_group(&mut self, stream: usize) -> GroupBits {
        if stream == 0 {
            return encode(&self.next_blocks(), CodingMode::Rds);
        }
        match self.rds2.get_mut(stream - 1) {
            Some(Rds2Stream::Tunnel(scheduler)) => {
                let blocks = scheduler.next_group(&self.state, &self.odas, self.clock.as_ref());
                encode(&blocks, CodingMode::Rds2)
            }
            Some(Rds2Stream::FileTransfer(sender)) => {
                encode(&sender.next_group(), CodingMode::Rds2)
            }
            None => GroupBits::default(),
        }
    }
}

impl std::fmt::Debug for RdsEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdsEncoder")
            .field("state", &self.state)
            .field("odas", &self.odas)
            .field("streams", &self.stream_count())
            .finish()
    }
}

fn initial_state(params: &EncoderParams) -> Result<RdsState, RdsError> {
    let mut state = RdsState::new(params.region);
    state.pi = params.pi;
    state.tp = params.tp;
    state.ta = params.ta;
    state.ms = params.ms;
    state.ct = params.clock_time;
    state.apply(RdsCommand::SetPty(params.pty))?;
    state.apply(RdsCommand::SetDi(params.di))?;
    state.apply(RdsCommand::SetPs(PsText::new(&params.ps)?))?;
    state.apply(RdsCommand::SetRt(RadioText::new(&params.rt)?))?;
    state.apply(RdsCommand::SetPtyn(PtynText::new(&params.ptyn)?))?;
    state.apply(RdsCommand::SetLps(LongPs::new(&params.lps)?))?;
    state.apply(RdsCommand::SetErt(EnhancedText::new(&params.ert)?))?;
    for &freq in &params.af {
        state.apply(RdsCommand::AddAf(freq))?;
    }
    state.apply(RdsCommand::SetRtPlusTags(tags_from_fields(params.rtplus)))?;
    state.apply(RdsCommand::SetErtPlusTags(tags_from_fields(params.ertplus)))?;
    Ok(state)
}
