//! Gregorian to Jalali (solar Hijri) date conversion.
//!
//! The conversion counts days from 1600-01-01 (Gregorian), shifts them by the
//! 79 days separating that epoch from Farvardin 1st, 979 (Jalali), and then
//! decomposes the result into 33-year cycles and 4-year sub-cycles whose first
//! year is the 366-day one.
//!
//! Inputs are not validated. Dates before 1600-03-21 are outside the supported
//! range and give unspecified results.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use std::fmt;

const GREGORIAN_DAYS_IN_MONTH: [i32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const JALALI_DAYS_IN_MONTH: [i32; 12] = [31, 31, 31, 31, 31, 31, 30, 30, 30, 30, 30, 29];

const GREGORIAN_EPOCH_YEAR: i32 = 1600;
const JALALI_EPOCH_YEAR: i32 = 979;
const JALALI_EPOCH_OFFSET_DAYS: i32 = 79;
const DAYS_PER_33_YEARS: i32 = 12053;
const DAYS_PER_4_YEARS: i32 = 1461;

/// A date in the Jalali calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JalaliDate {
    /// Jalali year
    pub year: i32,
    /// Month, 1-based
    pub month: u32,
    /// Day of month, 1-based
    pub day: u32,
}

impl JalaliDate {
    #[must_use]
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for JalaliDate {
    fn from(date: NaiveDate) -> Self {
        let (year, month, day) = gregorian_to_jalali(date.year(), date.month(), date.day());
        Self::new(year, month, day)
    }
}

const fn is_gregorian_leap(years_since_epoch: i32) -> bool {
    (years_since_epoch.rem_euclid(4) == 0 && years_since_epoch.rem_euclid(100) != 0)
        || years_since_epoch.rem_euclid(400) == 0
}

/// Convert a proleptic Gregorian date to `(year, month, day)` in the Jalali calendar.
///
/// Month 12 takes whatever remains of the year without an upper-bound check,
/// so callers must pass valid Gregorian dates.
#[must_use]
#[allow(clippy::cast_possible_wrap)] // month and day are small calendar values
pub fn gregorian_to_jalali(year: i32, month: u32, day: u32) -> (i32, u32, u32) {
    let gy = year - GREGORIAN_EPOCH_YEAR;
    let gm = month as i32 - 1;
    let gd = day as i32 - 1;

    let mut g_day_no = 365 * gy + (gy + 3).div_euclid(4) - (gy + 99).div_euclid(100) + (gy + 399).div_euclid(400);
    g_day_no += GREGORIAN_DAYS_IN_MONTH
        .iter()
        .take(gm.max(0) as usize)
        .sum::<i32>();
    if gm > 1 && is_gregorian_leap(gy) {
        g_day_no += 1;
    }
    g_day_no += gd;

    let mut j_day_no = g_day_no - JALALI_EPOCH_OFFSET_DAYS;

    let cycles = j_day_no.div_euclid(DAYS_PER_33_YEARS);
    j_day_no = j_day_no.rem_euclid(DAYS_PER_33_YEARS);

    let mut jy = JALALI_EPOCH_YEAR + 33 * cycles + 4 * j_day_no.div_euclid(DAYS_PER_4_YEARS);
    j_day_no = j_day_no.rem_euclid(DAYS_PER_4_YEARS);

    // The first year of a sub-cycle has 366 days, the remaining three 365.
    if j_day_no >= 366 {
        jy += (j_day_no - 1).div_euclid(365);
        j_day_no = (j_day_no - 1).rem_euclid(365);
    }

    for (index, &length) in JALALI_DAYS_IN_MONTH.iter().take(11).enumerate() {
        if j_day_no < length {
            return (jy, index as u32 + 1, (j_day_no + 1) as u32);
        }
        j_day_no -= length;
    }

    (jy, 12, (j_day_no + 1) as u32)
}

/// A wall-clock instant rendered with a Jalali date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTime {
    date: JalaliDate,
    hour: u32,
    minute: u32,
    second: u32,
}

impl SessionTime {
    /// Jalali date part
    #[must_use]
    pub const fn date(&self) -> JalaliDate {
        self.date
    }

    /// `HH:MM:SS` part
    #[must_use]
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl fmt::Display for SessionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.clock())
    }
}

/// Convert a local date-time into the `YYYY-MM-DDTHH:MM:SS` Jalali timestamp
#[must_use]
pub fn jalali_timestamp(now: NaiveDateTime) -> SessionTime {
    SessionTime {
        date: JalaliDate::from(now.date()),
        hour: now.hour(),
        minute: now.minute(),
        second: now.second(),
    }
}
