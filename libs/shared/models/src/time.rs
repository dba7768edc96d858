use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Day of the week in conventional week order (monday first).
///
/// Windows and slot lookups key on this enum rather than on raw integers so
/// that calendar dates map to a day through one pure function, independent
/// of runtime locale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Map a calendar date to its day of week (proleptic Gregorian).
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid day of week: {0}")]
pub struct InvalidDay(pub String);

impl FromStr for DayOfWeek {
    type Err = InvalidDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monday" => Ok(DayOfWeek::Monday),
            "tuesday" => Ok(DayOfWeek::Tuesday),
            "wednesday" => Ok(DayOfWeek::Wednesday),
            "thursday" => Ok(DayOfWeek::Thursday),
            "friday" => Ok(DayOfWeek::Friday),
            "saturday" => Ok(DayOfWeek::Saturday),
            "sunday" => Ok(DayOfWeek::Sunday),
            other => Err(InvalidDay(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid time of day: {0}")]
pub struct InvalidTime(pub String);

fn clock_time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])(?::([0-5][0-9]))?$")
            .expect("clock time pattern compiles")
    })
}

/// Parse a clock time in `HH:MM` or `HH:MM:SS` form.
///
/// Syntax is checked before any range math so malformed input surfaces as a
/// validation error rather than a store round trip.
pub fn parse_clock_time(input: &str) -> Result<NaiveTime, InvalidTime> {
    let captures = clock_time_pattern()
        .captures(input)
        .ok_or_else(|| InvalidTime(input.to_string()))?;

    let hour: u32 = captures[1].parse().map_err(|_| InvalidTime(input.to_string()))?;
    let minute: u32 = captures[2].parse().map_err(|_| InvalidTime(input.to_string()))?;
    let second: u32 = captures
        .get(3)
        .map(|m| m.as_str().parse())
        .transpose()
        .map_err(|_| InvalidTime(input.to_string()))?
        .unwrap_or(0);

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| InvalidTime(input.to_string()))
}

fn minutes_since_midnight(t: NaiveTime) -> u32 {
    t.num_seconds_from_midnight() / 60
}

/// Half-open overlap test over same-day clock ranges.
///
/// Ranges that merely touch (one ends exactly where the other starts) do
/// not overlap.
pub fn ranges_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    let (a_start, a_end) = (minutes_since_midnight(a_start), minutes_since_midnight(a_end));
    let (b_start, b_end) = (minutes_since_midnight(b_start), minutes_since_midnight(b_end));

    a_start < b_end && b_start < a_end
}
