// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Station content shared by every scheduler of an encoder.

use crate::af::{AfList, Region};
use crate::error::RdsError;
use crate::publish::Published;
use crate::pty::PTY_MAX;
use crate::rtplus::{RtPlusTag, TagSet};
use crate::text::{EnhancedText, LongPs, PsText, PtynText, RadioText};

pub const DI_MAX: u8 = 15;

/// Everything the encoder transmits. Multi-segment fields are
/// [`Published`] so schedulers can pick up changes at message boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct RdsState {
    pub region: Region,
    pub pi: u16,
    pub pty: u8,
    pub tp: bool,
    pub ta: bool,
    pub ms: bool,
    pub di: u8,
    pub ct: bool,
    pub ps: Published<PsText>,
    pub rt: Published<RadioText>,
    pub ptyn: Published<PtynText>,
    pub af: Published<AfList>,
    pub lps: Published<LongPs>,
    pub ert: Published<EnhancedText>,
    pub rtplus: TagSet,
    pub ertplus: TagSet,
}

impl RdsState {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            pi: 0x1000,
            pty: 0,
            tp: false,
            ta: false,
            ms: true,
            di: 1,
            ct: false,
            ps: Published::new(PsText::default()),
            rt: Published::new(RadioText::default()),
            ptyn: Published::new(PtynText::default()),
            af: Published::new(AfList::new(region)),
            lps: Published::new(LongPs::default()),
            ert: Published::new(EnhancedText::default()),
            rtplus: TagSet::default(),
            ertplus: TagSet::default(),
        }
    }

    /// Validate and apply one change. On error nothing is modified.
    pub fn apply(&mut self, cmd: RdsCommand) -> Result<(), RdsError> {
        match cmd {
            RdsCommand::SetPi(pi) => self.pi = pi,
            RdsCommand::SetPs(ps) => self.ps.publish(ps),
            RdsCommand::SetRt(rt) => self.rt.publish(rt),
            RdsCommand::SetPty(pty) => {
                if pty > PTY_MAX {
                    return Err(RdsError::PtyOutOfRange(pty));
                }
                self.pty = pty;
            }
            RdsCommand::SetPtyn(ptyn) => self.ptyn.publish(ptyn),
            RdsCommand::SetTa(ta) => self.ta = ta,
            RdsCommand::SetTp(tp) => self.tp = tp,
            RdsCommand::SetMs(ms) => self.ms = ms,
            RdsCommand::SetDi(di) => {
                if di > DI_MAX {
                    return Err(RdsError::DiOutOfRange(di));
                }
                self.di = di;
            }
            RdsCommand::SetClockTime(ct) => self.ct = ct,
            RdsCommand::AddAf(freq) => {
                let mut af = *self.af.value();
                af.add(freq)?;
                self.af.publish(af);
            }
            RdsCommand::ClearAf => self.af.publish(AfList::new(self.region)),
            RdsCommand::SetRtPlusTags(tags) => {
                TagSet::validate(&tags)?;
                self.rtplus.tags = tags;
            }
            RdsCommand::SetRtPlusFlags { running, toggle } => {
                self.rtplus.running = running;
                self.rtplus.toggle = toggle;
            }
            RdsCommand::SetLps(lps) => self.lps.publish(lps),
            RdsCommand::SetErt(ert) => self.ert.publish(ert),
            RdsCommand::SetErtPlusTags(tags) => {
                TagSet::validate(&tags)?;
                self.ertplus.tags = tags;
            }
            RdsCommand::SetErtPlusFlags { running, toggle } => {
                self.ertplus.running = running;
                self.ertplus.toggle = toggle;
            }
        }
        Ok(())
    }
}

impl Default for RdsState {
    fn default() -> Self {
        Self::new(Region::default())
    }
}

/// One content change, carrying an already validated payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RdsCommand {
    SetPi(u16),
    SetPs(PsText),
    SetRt(RadioText),
    SetPty(u8),
    SetPtyn(PtynText),
    SetTa(bool),
    SetTp(bool),
    SetMs(bool),
    SetDi(u8),
    SetClockTime(bool),
    AddAf(f32),
    ClearAf,
    SetRtPlusTags([RtPlusTag; 2]),
    SetRtPlusFlags { running: bool, toggle: bool },
    SetLps(LongPs),
    SetErt(EnhancedText),
    SetErtPlusTags([RtPlusTag; 2]),
    SetErtPlusFlags { running: bool, toggle: bool },
}
