// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Clock-time (4A) content.

use chrono::{Datelike, Local, Timelike, Utc};

/// Largest local offset that fits the 5-bit magnitude, in half hours.
const MAX_OFFSET_HALF_HOURS: i32 = 31;

/// UTC date/time plus the local offset, as read from a [`WallClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    /// Local time minus UTC.
    pub utc_offset_secs: i32,
}

impl ClockReading {
    /// Whole UTC minutes since the MJD epoch, used to detect minute changes.
    pub fn minute_stamp(&self) -> i64 {
        i64::from(modified_julian_day(self.year, self.month, self.day)) * 1440
            + i64::from(self.hour) * 60
            + i64::from(self.minute)
    }
}

/// Source of wall-clock time for the scheduler.
pub trait WallClock: Send {
    fn now(&self) -> ClockReading;
}

/// The host clock and time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> ClockReading {
        let local = Local::now();
        let utc = local.with_timezone(&Utc);
        ClockReading {
            year: utc.year(),
            month: utc.month(),
            day: utc.day(),
            hour: utc.hour(),
            minute: utc.minute(),
            utc_offset_secs: local.offset().local_minus_utc(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub mjd: u32,
    pub hour: u8,
    pub minute: u8,
    /// Local offset from UTC in half hours.
    pub offset: i8,
}

impl ClockTime {
    pub fn from_reading(reading: &ClockReading) -> Self {
        Self {
            mjd: modified_julian_day(reading.year, reading.month, reading.day),
            hour: reading.hour as u8,
            minute: reading.minute as u8,
            offset: offset_half_hours(reading.utc_offset_secs),
        }
    }

    /// Bits for blocks 1 (low two bits), 2 and 3.
    pub fn payload(&self) -> [u16; 3] {
        let mjd = self.mjd & 0x1_FFFF;
        let hour = u32::from(self.hour & 0x1F);
        let b1 = (mjd >> 15) as u16;
        let b2 = ((mjd << 1) | (hour >> 4)) as u16;
        let b3 = ((hour & 0x0F) as u16) << 12
            | u16::from(self.minute & 0x3F) << 6
            | u16::from(self.offset < 0) << 5
            | u16::from(self.offset.unsigned_abs() & 0x1F);
        [b1, b2, b3]
    }
}

/// Modified Julian Day for a civil date (`month` 1..=12).
pub fn modified_julian_day(year: i32, month: u32, day: u32) -> u32 {
    let leap = i64::from(month <= 2);
    let y = i64::from(year) - 1900;
    let m = i64::from(month);
    let mjd = 14_956
        + i64::from(day)
        + ((y - leap) as f64 * 365.25).floor() as i64
        + ((m + 1 + leap * 12) as f64 * 30.6001).floor() as i64;
    mjd.max(0) as u32
}

/// Round a UTC offset to the nearest half hour.
pub fn offset_half_hours(offset_secs: i32) -> i8 {
    let half_hours = (f64::from(offset_secs) / 1800.0).round() as i32;
    half_hours.clamp(-MAX_OFFSET_HALF_HOURS, MAX_OFFSET_HALF_HOURS) as i8
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mjd_reference_dates() {
        assert_eq!(modified_julian_day(2000, 1, 1), 51_544);
        assert_eq!(modified_julian_day(2024, 1, 1), 60_310);
        assert_eq!(modified_julian_day(2024, 3, 1), 60_370);
        assert_eq!(modified_julian_day(2026, 10, 16), 61_329);
    }

    #[test]
    fn offsets_round_to_half_hours() {
        assert_eq!(offset_half_hours(0), 0);
        assert_eq!(offset_half_hours(3_600), 2);
        assert_eq!(offset_half_hours(-18_000), -10);
        assert_eq!(offset_half_hours(19_800), 11);
        assert_eq!(offset_half_hours(20_700), 12);
        assert_eq!(offset_half_hours(-100_000), -31);
    }

    #[test]
    fn payload_layout() {
        let ct = ClockTime {
            mjd: 60_310,
            hour: 18,
            minute: 45,
            offset: -10,
        };
        let [b1, b2, b3] = ct.payload();
        assert_eq!(b1, (60_310u32 >> 15) as u16);
        assert_eq!(b2, ((60_310u32 << 1) as u16) | 1);
        assert_eq!(b3, 2 << 12 | 45 << 6 | 1 << 5 | 10);
    }

    #[test]
    fn reading_converts_to_clock_time() {
        let reading = ClockReading {
            year: 2024,
            month: 1,
            day: 1,
            hour: 12,
            minute: 30,
            utc_offset_secs: 7_200,
        };
        let ct = ClockTime::from_reading(&reading);
        assert_eq!(ct.mjd, 60_310);
        assert_eq!((ct.hour, ct.minute, ct.offset), (12, 30, 4));
    }

    #[test]
    fn minute_stamp_crosses_midnight() {
        let before = ClockReading {
            year: 2025,
            month: 12,
            day: 31,
            hour: 23,
            minute: 59,
            utc_offset_secs: 0,
        };
        let after = ClockReading {
            year: 2026,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            ..before
        };
        assert_eq!(after.minute_stamp() - before.minute_stamp(), 1);
    }
}
