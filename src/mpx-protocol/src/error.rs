// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use mpx_rds::RdsError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("{0} takes no argument")]
    UnexpectedArgument(&'static str),

    #[error("{field}: {value:?} is not a valid number")]
    BadNumber { field: &'static str, value: String },

    #[error("{0:?} is not a 16-bit hex value")]
    BadHex(String),

    #[error("{field} expects {expected} comma-separated values, got {found}")]
    FieldCount {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown programme type {0:?}")]
    UnknownPty(String),

    #[error(transparent)]
    Invalid(#[from] RdsError),
}
