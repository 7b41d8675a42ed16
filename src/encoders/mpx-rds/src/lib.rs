// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! RDS / RDS2 group encoder.
//!
//! [`RdsEncoder`] owns the published station content, the ODA registry and
//! one scheduler per data stream, and hands out coded groups to the MPX
//! modulators through [`mpx_core::GroupSource`].

pub mod af;
pub mod callsign;
pub mod charset;
pub mod checkword;
pub mod clock;
pub mod crc;
pub mod encoder;
pub mod error;
pub mod group;
pub mod oda;
pub mod publish;
pub mod pty;
pub mod rft;
pub mod rtplus;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod text;

pub use af::{AfList, Region, MAX_AFS};
pub use callsign::callsign_to_pi;
pub use checkword::{encode, CodingMode};
pub use clock::{ClockReading, ClockTime, SystemClock, WallClock};
pub use encoder::{EncoderParams, EncoderVariant, Rds2Stream, RdsEncoder};
pub use error::RdsError;
pub use group::{BlockQuad, GroupContent, GroupType, GroupVersion};
pub use oda::{OdaEntry, OdaRegistry};
pub use pty::{pty_code, pty_name, PTY_MAX};
pub use rft::RftSender;
pub use rtplus::{rtplus_content_id, rtplus_content_name, tags_from_fields, RtPlusTag, TagSet};
pub use scheduler::{Scheduler, StreamRole};
pub use snapshot::RdsSnapshot;
pub use state::{RdsCommand, RdsState, DI_MAX};
pub use text::{EnhancedText, LongPs, PsText, PtynText, RadioText};
