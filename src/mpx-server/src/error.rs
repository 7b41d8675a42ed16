// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use mpx_core::DspError;
use mpx_rds::RdsError;
use thiserror::Error;

/// Why the generation thread refused a control command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Rds(#[from] RdsError),

    #[error(transparent)]
    Dsp(#[from] DspError),
}
