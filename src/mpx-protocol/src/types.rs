// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use mpx_rds::{RdsCommand, RdsSnapshot};

/// Number of mixer levels addressed by `MPX`: pilot, RDS and three RDS2
/// carriers.
pub const CARRIER_LEVELS: usize = 5;

/// A parsed control line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    Rds(RdsCommand),
    /// Carrier levels in percent, pilot first.
    CarrierVolumes([f32; CARRIER_LEVELS]),
    /// Output level in percent.
    OutputVolume(f32),
    Status,
}

/// Reply to a control line.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlResponse {
    Ok,
    Error(String),
    Status(Box<RdsSnapshot>),
}

impl ControlResponse {
    /// Single reply line without the trailing newline: `OK`,
    /// `ERR <message>` or the JSON snapshot.
    pub fn to_line(&self) -> String {
        match self {
            ControlResponse::Ok => "OK".to_string(),
            ControlResponse::Error(msg) => format!("ERR {}", msg),
            ControlResponse::Status(snapshot) => match serde_json::to_string(snapshot) {
                Ok(json) => json,
                Err(e) => format!("ERR {}", e),
            },
        }
    }
}
