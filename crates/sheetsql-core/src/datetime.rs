//! Calendar times and their two numeric encodings
//!
//! The SQL side stores absolute times as seconds since the unix epoch. The
//! spreadsheet side uses serial day numbers, where serial 25569.0 is
//! 1970-01-01T00:00:00Z and one unit is one day (86400 seconds). Conversions
//! round to the nearest second, so `to_time(to_serial(t)) == t` for every
//! whole-second `t`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::error::{Error, Result};

/// Serial day number of 1970-01-01T00:00:00Z
pub const UNIX_EPOCH_SERIAL: f64 = 25569.0;

/// Seconds in one serial day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Offset subtracted from a stored Julian day number on read
pub const JULIAN_OFFSET: f64 = 2440587.5;

/// Date-time layouts recognized in cell text, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts recognized in cell text, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%B %d, %Y"];

/// A whole-second UTC calendar time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarTime(NaiveDateTime);

impl CalendarTime {
    /// Build from calendar fields
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .map(CalendarTime)
            .ok_or_else(|| {
                Error::InvalidDate(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                ))
            })
    }

    /// Build from seconds since the unix epoch
    pub fn from_unix(seconds: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(seconds, 0).map(|dt| CalendarTime(dt.naive_utc()))
    }

    /// Build from a spreadsheet serial day number
    pub fn from_serial(serial: f64) -> Option<Self> {
        if !serial.is_finite() {
            return None;
        }
        Self::from_unix(to_time(serial))
    }

    /// Seconds since the unix epoch
    pub fn unix_seconds(&self) -> i64 {
        self.0.and_utc().timestamp()
    }

    /// Spreadsheet serial day number
    pub fn to_serial(&self) -> f64 {
        to_serial(self.unix_seconds())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }
}

impl From<NaiveDateTime> for CalendarTime {
    fn from(dt: NaiveDateTime) -> Self {
        // Sub-second precision is dropped
        CalendarTime(dt.with_nanosecond(0).unwrap_or(dt))
    }
}

/// Unix seconds to spreadsheet serial
pub fn to_serial(seconds: i64) -> f64 {
    UNIX_EPOCH_SERIAL + seconds as f64 / SECONDS_PER_DAY
}

/// Spreadsheet serial to unix seconds, rounded to the nearest second
pub fn to_time(serial: f64) -> i64 {
    ((serial - UNIX_EPOCH_SERIAL) * SECONDS_PER_DAY).round() as i64
}

/// Stored Julian day number to the value emitted for a spreadsheet cell
pub fn from_julian(julian: f64) -> f64 {
    julian - JULIAN_OFFSET
}

/// Parse cell text as a calendar date or date-time.
///
/// Accepts RFC 3339 (converted to UTC), ISO 8601 date-times with a space or
/// `T` separator, slash-separated dates, and a few spelled-out month forms.
/// Returns `None` for anything else, including bare numbers.
pub fn try_parse_datetime(text: &str) -> Option<CalendarTime> {
    let text = text.trim();
    if text.is_empty() || !text.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(CalendarTime::from(dt.naive_utc()));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(CalendarTime::from(dt));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return d.and_hms_opt(0, 0, 0).map(CalendarTime::from);
        }
    }

    None
}
