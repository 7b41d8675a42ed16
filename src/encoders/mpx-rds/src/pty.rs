// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Programme Type names for RDS (ETSI) and RBDS (NRSC).

use mpx_core::normalize_name;

use crate::af::Region;

pub const PTY_MAX: u8 = 31;

const ETSI_PTYS: [&str; 32] = [
    "None",
    "News",
    "Current affairs",
    "Information",
    "Sport",
    "Education",
    "Drama",
    "Culture",
    "Science",
    "Varied",
    "Pop music",
    "Rock music",
    "Easy listening",
    "Light classical",
    "Serious classical",
    "Other music",
    "Weather",
    "Finance",
    "Children's programs",
    "Social affairs",
    "Religion",
    "Phone-in",
    "Travel",
    "Leisure",
    "Jazz music",
    "Country music",
    "National music",
    "Oldies music",
    "Folk music",
    "Documentary",
    "Alarm test",
    "Alarm",
];

const NRSC_PTYS: [&str; 32] = [
    "None",
    "News",
    "Information",
    "Sports",
    "Talk",
    "Rock",
    "Classic rock",
    "Adult hits",
    "Soft rock",
    "Top 40",
    "Country",
    "Oldies",
    "Soft music",
    "Nostalgia",
    "Jazz",
    "Classical",
    "R&B",
    "Soft R&B",
    "Language",
    "Religious music",
    "Religious talk",
    "Personality",
    "Public",
    "College",
    "Spanish talk",
    "Spanish music",
    "Hip-Hop",
    "Unassigned",
    "Unassigned",
    "Weather",
    "Emergency test",
    "Emergency",
];

fn table(region: Region) -> &'static [&'static str; 32] {
    match region {
        Region::Europe => &ETSI_PTYS,
        Region::NorthAmerica => &NRSC_PTYS,
    }
}

pub fn pty_name(code: u8, region: Region) -> Option<&'static str> {
    table(region).get(usize::from(code)).copied()
}

/// Look up a PTY by name, ignoring case and punctuation.
pub fn pty_code(name: &str, region: Region) -> Option<u8> {
    let wanted = normalize_name(name);
    table(region)
        .iter()
        .position(|candidate| normalize_name(candidate) == wanted)
        .map(|idx| idx as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_by_region() {
        assert_eq!(pty_name(10, Region::Europe), Some("Pop music"));
        assert_eq!(pty_name(10, Region::NorthAmerica), Some("Country"));
        assert_eq!(pty_name(31, Region::Europe), Some("Alarm"));
        assert_eq!(pty_name(32, Region::Europe), None);
    }

    #[test]
    fn lookup_is_lenient() {
        assert_eq!(pty_code("rock music", Region::Europe), Some(11));
        assert_eq!(pty_code("PHONE IN", Region::Europe), Some(21));
        assert_eq!(pty_code("hip hop", Region::NorthAmerica), Some(26));
        assert_eq!(pty_code("Polka", Region::Europe), None);
    }
}
