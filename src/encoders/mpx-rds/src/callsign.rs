// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! North American call sign to PI code conversion (NRSC-4).

use crate::error::RdsError;

const K_BASE: u16 = 4096;
const W_BASE: u16 = 21672;

/// Convert a four-letter K/W call sign to its PI code.
pub fn callsign_to_pi(callsign: &str) -> Result<u16, RdsError> {
    let invalid = || RdsError::InvalidCallsign(callsign.to_string());
    let letters: Vec<u8> = callsign.bytes().map(|b| b.to_ascii_uppercase()).collect();
    if letters.len() != 4 || !letters.iter().all(u8::is_ascii_uppercase) {
        return Err(invalid());
    }
    let base = match letters[0] {
        b'K' => K_BASE,
        b'W' => W_BASE,
        _ => return Err(invalid()),
    };
    let digits = letters[1..]
        .iter()
        .fold(0u16, |acc, &l| acc * 26 + u16::from(l - b'A'));
    let mut pi = base + digits;

    if pi & 0x0F00 == 0 {
        pi = 0xA000 + ((pi & 0xF000) >> 4) + (pi & 0x00FF);
    }
    if pi & 0x00FF == 0 {
        pi = 0xAF00 + ((pi & 0xFF00) >> 8);
    }
    Ok(pi)
}
