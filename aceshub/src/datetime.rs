use std::str::FromStr;

use serde::Serialize;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    OffsetDateTime, PrimitiveDateTime,
};

use crate::Error;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const NAIVE_DATE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const NAIVE_DATE_TIME_NO_SECONDS_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const DISPLAY_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");
const DISPLAY_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");

/// A simple date object, encapsulating a year, month and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(time::Date);

impl Date {
    /// Midnight (UTC) at the start of this date.
    pub fn start_of_day(&self) -> DateTime {
        DateTime(self.0.midnight().assume_utc())
    }

    /// Human-friendly rendering of this date, e.g. `Apr 2, 2025`.
    pub fn to_display_string(&self) -> String {
        self.0
            .format(DISPLAY_DATE_FORMAT)
            .unwrap_or_else(|_| self.to_string())
    }
}

impl FromStr for Date {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| Error::InvalidDate(s.to_string()))
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.format(DATE_FORMAT).map_err(|_| std::fmt::Error)?
        )
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<Date> for time::Date {
    fn from(d: Date) -> Self {
        d.0
    }
}

impl From<time::Date> for Date {
    fn from(d: time::Date) -> Self {
        Self(d)
    }
}

/// Representation of a date and time with time zone.
///
/// Timestamps without an explicit offset (e.g. `2025-04-06T14:30:00`) are
/// interpreted as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(OffsetDateTime);

impl DateTime {
    /// The current date and time in UTC.
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// The calendar date of this timestamp.
    pub fn date(&self) -> Date {
        Date(self.0.date())
    }

    /// Human-friendly rendering of the date part, e.g. `Apr 20, 2025`.
    pub fn to_display_date(&self) -> String {
        self.date().to_display_string()
    }

    /// Human-friendly rendering of the time part, e.g. `9:00 AM`.
    pub fn to_display_time(&self) -> String {
        self.0
            .format(DISPLAY_TIME_FORMAT)
            .unwrap_or_else(|_| self.to_string())
    }

    /// Signed number of seconds from `earlier` to `self`.
    pub fn seconds_since(&self, earlier: &DateTime) -> i64 {
        (self.0 - earlier.0).whole_seconds()
    }
}

impl FromStr for DateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
            return Ok(Self(dt));
        }
        PrimitiveDateTime::parse(s, NAIVE_DATE_TIME_FORMAT)
            .or_else(|_| PrimitiveDateTime::parse(s, NAIVE_DATE_TIME_NO_SECONDS_FORMAT))
            .map(|dt| Self(dt.assume_utc()))
            .map_err(|_| Error::InvalidDateTime(s.to_string()))
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.format(&Rfc3339).map_err(|_| std::fmt::Error)?
        )
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<DateTime> for OffsetDateTime {
    fn from(dt: DateTime) -> Self {
        dt.0
    }
}

impl From<OffsetDateTime> for DateTime {
    fn from(dt: OffsetDateTime) -> Self {
        Self(dt)
    }
}

impl From<Date> for DateTime {
    fn from(d: Date) -> Self {
        d.start_of_day()
    }
}
