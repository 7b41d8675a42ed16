// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Serializable view of the published station content.

use serde::Serialize;

use crate::pty::pty_name;
use crate::rtplus::{rtplus_content_name, TagSet};
use crate::state::RdsState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSnapshot {
    pub content_type: u8,
    pub name: &'static str,
    pub start: u8,
    pub len: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggingSnapshot {
    pub running: bool,
    pub toggle: bool,
    pub tags: Vec<TagSnapshot>,
}

impl From<&TagSet> for TaggingSnapshot {
    fn from(set: &TagSet) -> Self {
        Self {
            running: set.running,
            toggle: set.toggle,
            tags: set
                .tags
                .iter()
                .map(|tag| TagSnapshot {
                    content_type: tag.content_type,
                    name: rtplus_content_name(tag.content_type).unwrap_or("UNKNOWN"),
                    start: tag.start,
                    len: tag.len,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RdsSnapshot {
    pub pi: String,
    pub ps: String,
    pub rt: String,
    pub pty: u8,
    pub pty_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptyn: Option<String>,
    pub tp: bool,
    pub ta: bool,
    pub ms: bool,
    pub di: u8,
    pub ct: bool,
    pub af: Vec<String>,
    pub rtplus: TaggingSnapshot,
    pub ertplus: TaggingSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ert: Option<String>,
}

impl RdsSnapshot {
    pub fn from_state(state: &RdsState) -> Self {
        let ptyn = state.ptyn.value();
        let lps = state.lps.value();
        let ert = state.ert.value();
        Self {
            pi: format!("{:04X}", state.pi),
            ps: state.ps.value().to_string(),
            rt: state.rt.value().to_string(),
            pty: state.pty,
            pty_name: pty_name(state.pty, state.region).unwrap_or("None"),
            ptyn: (!ptyn.is_empty()).then(|| ptyn.to_string()),
            tp: state.tp,
            ta: state.ta,
            ms: state.ms,
            di: state.di,
            ct: state.ct,
            af: state.af.value().frequencies(),
            rtplus: TaggingSnapshot::from(&state.rtplus),
            ertplus: TaggingSnapshot::from(&state.ertplus),
            lps: (!lps.is_empty()).then(|| lps.to_string()),
            ert: (!ert.is_empty()).then(|| ert.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::af::Region;
    use crate::rtplus::tags_from_fields;
    use crate::state::RdsCommand;
    use crate::text::{PsText, RadioText};

    #[test]
    fn snapshot_reflects_published_content() {
        let mut state = RdsState::new(Region::NorthAmerica);
        state.pi = 0x54C4;
        state
            .apply(RdsCommand::SetPs(PsText::new("WABC").unwrap()))
            .unwrap();
        state
            .apply(RdsCommand::SetRt(RadioText::new("Traffic on the 8s").unwrap()))
            .unwrap();
        state.apply(RdsCommand::SetPty(10)).unwrap();
        state.apply(RdsCommand::AddAf(97.3)).unwrap();
        state
            .apply(RdsCommand::SetRtPlusTags(tags_from_fields([1, 0, 5, 4, 8, 3])))
            .unwrap();

        let snap = RdsSnapshot::from_state(&state);
        assert_eq!(snap.pi, "54C4");
        assert_eq!(snap.ps, "WABC    ");
        assert_eq!(snap.rt, "Traffic on the 8s");
        assert_eq!(snap.pty_name, "Country");
        assert_eq!(snap.ptyn, None);
        assert_eq!(snap.af, vec!["97.3 MHz".to_string()]);
        assert_eq!(snap.rtplus.tags[0].name, "ITEM.TITLE");
        assert_eq!(snap.rtplus.tags[1].name, "ITEM.ARTIST");
        assert_eq!(snap.lps, None);
    }
}
