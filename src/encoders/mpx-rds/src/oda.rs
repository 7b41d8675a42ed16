// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Open Data Application registry announced through group 3A.

use crate::error::RdsError;
use crate::group::GroupType;

pub const MAX_ODAS: usize = 8;

pub const AID_RT_PLUS: u16 = 0x4BD7;
pub const AID_ERT: u16 = 0x6552;
pub const AID_ERT_PLUS: u16 = 0x4BD8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OdaEntry {
    pub group: GroupType,
    pub aid: u16,
    pub message: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OdaRegistry {
    entries: [Option<OdaEntry>; MAX_ODAS],
    len: usize,
}

impl OdaRegistry {
    pub fn new() -> Self {
        Self {
            entries: [None; MAX_ODAS],
            len: 0,
        }
    }

    pub fn register(&mut self, group: GroupType, aid: u16, message: u16) -> Result<(), RdsError> {
        if aid == AID_ERT && group.is_version_b() {
            return Err(RdsError::ErtVersionB);
        }
        let slot = self
            .entries
            .get_mut(self.len)
            .ok_or(RdsError::OdaRegistryFull(MAX_ODAS))?;
        *slot = Some(OdaEntry {
            group,
            aid,
            message,
        });
        self.len += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &OdaEntry> {
        self.entries[..self.len].iter().flatten()
    }

    /// Entry to announce at `cursor` and the cursor for the next 3A group.
    pub fn announcement(&self, cursor: usize) -> Option<(OdaEntry, usize)> {
        if self.len == 0 {
            return None;
        }
        let idx = cursor % self.len;
        let entry = self.entries[idx]?;
        Some((entry, (idx + 1) % self.len))
    }

    /// Group registered for `aid`, if any.
    pub fn group_for(&self, aid: u16) -> Option<GroupType> {
        self.iter().find(|e| e.aid == aid).map(|e| e.group)
    }
}

impl Default for OdaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
