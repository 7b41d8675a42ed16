// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Line-based control protocol for mpx-rs.
//!
//! Control pipes and TCP clients send one ASCII command per line
//! (`PS MPXGEN`, `AF 97.3`, `STATUS`, ...). This crate turns those lines
//! into validated [`ControlCommand`]s and formats the replies.

pub mod ascii;
pub mod error;
pub mod types;

pub use ascii::parse_command;
pub use error::ParseError;
pub use types::{ControlCommand, ControlResponse};
