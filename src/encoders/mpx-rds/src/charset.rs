// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Translation to and from the RDS basic character set (EBU Latin).

use crate::error::RdsError;

/// EBU code table positions 0x80..=0x9B.
const LATIN: [char; 28] = [
    'á', 'à', 'é', 'è', 'í', 'ì', 'ó', 'ò', 'ú', 'ù', 'Ñ', 'Ç', 'Ş', 'ß', '¡', 'Ĳ', 'â', 'ä', 'ê',
    'ë', 'î', 'ï', 'ô', 'ö', 'û', 'ü', 'ñ', 'ç',
];
const LATIN_BASE: u8 = 0x80;
const DOLLAR: u8 = 0xAB;

pub fn to_rds_byte(c: char) -> Option<u8> {
    match c {
        '$' => Some(DOLLAR),
        ' '..='~' => Some(c as u8),
        _ => LATIN
            .iter()
            .position(|&l| l == c)
            .map(|idx| LATIN_BASE + idx as u8),
    }
}

pub fn from_rds_byte(byte: u8) -> char {
    match byte {
        DOLLAR => '$',
        0x20..=0x7E => byte as char,
        b if (LATIN_BASE..LATIN_BASE + LATIN.len() as u8).contains(&b) => {
            LATIN[usize::from(b - LATIN_BASE)]
        }
        _ => ' ',
    }
}

/// Encode `text` into the start of `out`; returns the encoded length.
pub fn encode_into(field: &'static str, text: &str, out: &mut [u8]) -> Result<usize, RdsError> {
    let max = out.len();
    let mut len = 0;
    for c in text.chars() {
        let slot = out.get_mut(len).ok_or(RdsError::TextTooLong {
            field,
            max,
        })?;
        *slot = to_rds_byte(c).ok_or(RdsError::UnsupportedCharacter(c))?;
        len += 1;
    }
    Ok(len)
}

/// Copy UTF-8 `text` verbatim into the start of `out`.
pub fn copy_utf8_into(field: &'static str, text: &str, out: &mut [u8]) -> Result<usize, RdsError> {
    let bytes = text.as_bytes();
    let max = out.len();
    let dest = out.get_mut(..bytes.len()).ok_or(RdsError::TextTooLong {
        field,
        max,
    })?;
    dest.copy_from_slice(bytes);
    Ok(bytes.len())
}

/// Decode RDS bytes for display, dropping carriage-return padding.
pub fn decode(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == b'\r').unwrap_or(bytes.len());
    bytes[..end].iter().map(|&b| from_rds_byte(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_maps_directly_except_dollar() {
        assert_eq!(to_rds_byte('A'), Some(b'A'));
        assert_eq!(to_rds_byte('~'), Some(b'~'));
        assert_eq!(to_rds_byte('$'), Some(0xAB));
        assert_eq!(from_rds_byte(0xAB), '$');
    }

    #[test]
    fn latin_letters_use_ebu_positions() {
        assert_eq!(to_rds_byte('é'), Some(0x82));
        assert_eq!(to_rds_byte('ü'), Some(0x99));
        assert_eq!(to_rds_byte('ç'), Some(0x9B));
        assert_eq!(from_rds_byte(0x97), 'ö');
        assert_eq!(to_rds_byte('€'), None);
    }

    #[test]
    fn encode_rejects_overflow_and_unknown_characters() {
        let mut buf = [b' '; 4];
        assert_eq!(encode_into("PS", "Café", &mut buf), Ok(4));
        assert_eq!(&buf, &[b'C', b'a', b'f', 0x82]);
        assert_eq!(
            encode_into("PS", "Cafés", &mut buf),
            Err(RdsError::TextTooLong { field: "PS", max: 4 })
        );
        assert_eq!(
            encode_into("PS", "a\u{1F600}", &mut buf),
            Err(RdsError::UnsupportedCharacter('\u{1F600}'))
        );
    }

    #[test]
    fn utf8_copy_counts_bytes() {
        let mut buf = [0u8; 4];
        assert_eq!(copy_utf8_into("eRT", "zł", &mut buf), Ok(3));
        assert!(copy_utf8_into("eRT", "złoty", &mut buf).is_err());
    }

    #[test]
    fn decode_stops_at_carriage_return() {
        assert_eq!(decode(b"Hi\r   "), "Hi");
        assert_eq!(decode(&[b'C', 0x82]), "Cé");
    }
}
