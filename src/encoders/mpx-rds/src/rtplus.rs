// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! RadioText Plus tagging (also used unchanged by eRT+).

use serde::{Deserialize, Serialize};

use crate::error::RdsError;

/// One tag: content type plus start offset and length marker within the
/// tagged text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RtPlusTag {
    pub content_type: u8,
    pub start: u8,
    pub len: u8,
}

/// Both tags of a tagging group plus the item flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagSet {
    pub tags: [RtPlusTag; 2],
    pub running: bool,
    pub toggle: bool,
}

impl TagSet {
    /// Check the field widths of the tagging group: six bits for every
    /// field except the second length, which has five.
    pub fn validate(tags: &[RtPlusTag; 2]) -> Result<(), RdsError> {
        let [first, second] = tags;
        let fields = [
            (first.content_type, 63),
            (first.start, 63),
            (first.len, 63),
            (second.content_type, 63),
            (second.start, 63),
            (second.len, 31),
        ];
        for (index, (value, max)) in fields.into_iter().enumerate() {
            if value > max {
                return Err(RdsError::TagOutOfRange { index, value });
            }
        }
        Ok(())
    }
}

/// Split `type, start, len, type, start, len` into two tags.
pub fn tags_from_fields(fields: [u8; 6]) -> [RtPlusTag; 2] {
    let [t0, s0, l0, t1, s1, l1] = fields;
    [
        RtPlusTag {
            content_type: t0,
            start: s0,
            len: l0,
        },
        RtPlusTag {
            content_type: t1,
            start: s1,
            len: l1,
        },
    ]
}

const CONTENT_TYPES: [&str; 64] = [
    "DUMMY_CLASS",
    "ITEM.TITLE",
    "ITEM.ALBUM",
    "ITEM.TRACKNUMBER",
    "ITEM.ARTIST",
    "ITEM.COMPOSITION",
    "ITEM.MOVEMENT",
    "ITEM.CONDUCTOR",
    "ITEM.COMPOSER",
    "ITEM.BAND",
    "ITEM.COMMENT",
    "ITEM.GENRE",
    "INFO.NEWS",
    "INFO.NEWS.LOCAL",
    "INFO.STOCKMARKET",
    "INFO.SPORT",
    "INFO.LOTTERY",
    "INFO.HOROSCOPE",
    "INFO.DAILY_DIVERSION",
    "INFO.HEALTH",
    "INFO.EVENT",
    "INFO.SCENE",
    "INFO.CINEMA",
    "INFO.TV",
    "INFO.DATE_TIME",
    "INFO.WEATHER",
    "INFO.TRAFFIC",
    "INFO.ALARM",
    "INFO.ADVERTISEMENT",
    "INFO.URL",
    "INFO.OTHER",
    "STATIONNAME.SHORT",
    "STATIONNAME.LONG",
    "PROGRAMME.NOW",
    "PROGRAMME.NEXT",
    "PROGRAMME.PART",
    "PROGRAMME.HOST",
    "PROGRAMME.EDITORIAL_STAFF",
    "PROGRAMME.FREQUENCY",
    "PROGRAMME.HOMEPAGE",
    "PROGRAMME.SUBCHANNEL",
    "PHONE.HOTLINE",
    "PHONE.STUDIO",
    "PHONE.OTHER",
    "SMS.STUDIO",
    "SMS.OTHER",
    "EMAIL.HOTLINE",
    "EMAIL.STUDIO",
    "EMAIL.OTHER",
    "MMS.OTHER",
    "CHAT",
    "CHAT.CENTRE",
    "VOTE.QUESTION",
    "VOTE.CENTRE",
    "RFU_1",
    "RFU_2",
    "PRIVATE_1",
    "PRIVATE_2",
    "PRIVATE_3",
    "PLACE",
    "APPOINTMENT",
    "IDENTIFIER",
    "PURCHASE",
    "GET_DATA",
];

pub fn rtplus_content_name(id: u8) -> Option<&'static str> {
    CONTENT_TYPES.get(usize::from(id)).copied()
}

pub fn rtplus_content_id(name: &str) -> Option<u8> {
    CONTENT_TYPES
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(name))
        .map(|idx| idx as u8)
}
