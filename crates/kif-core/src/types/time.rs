//! Points in time with optional precision, time zone and calendar.
//!
//! An [`Instant`] is a calendar datetime that may or may not carry an explicit
//! UTC offset. Zoneless instants compare by wall-clock reading; zoned ones by
//! the absolute moment they denote.

use super::{Item, KifError};
use crate::primitives::{MAX_TIME_PRECISION, MAX_UTC_OFFSET_SECONDS};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// PRECISION
// =============================================================================

/// Precision of a time value, from billions of years down to seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TimePrecision {
    BillionYears = 0,
    HundredMillionYears = 1,
    TenMillionYears = 2,
    MillionYears = 3,
    HundredThousandYears = 4,
    TenThousandYears = 5,
    Millennium = 6,
    Century = 7,
    Decade = 8,
    Year = 9,
    Month = 10,
    Day = 11,
    Hour = 12,
    Minute = 13,
    Second = 14,
}

impl TimePrecision {
    const LEVELS: [Self; (MAX_TIME_PRECISION + 1) as usize] = [
        Self::BillionYears,
        Self::HundredMillionYears,
        Self::TenMillionYears,
        Self::MillionYears,
        Self::HundredThousandYears,
        Self::TenThousandYears,
        Self::Millennium,
        Self::Century,
        Self::Decade,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
    ];

    /// Look up the precision with the given numeric code.
    pub fn check(code: u8) -> Result<Self, KifError> {
        Self::LEVELS.get(code as usize).copied().ok_or_else(|| {
            KifError::invalid(
                "TimePrecision::check",
                format!("precision {code} exceeds {MAX_TIME_PRECISION}"),
            )
        })
    }

    /// The numeric code of this precision.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TimePrecision {
    type Error = KifError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::check(value)
    }
}

impl From<TimePrecision> for u8 {
    fn from(value: TimePrecision) -> Self {
        value.code()
    }
}

// =============================================================================
// INSTANT
// =============================================================================

/// A datetime reading, optionally pinned to a UTC offset (seconds east).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Instant {
    datetime: NaiveDateTime,
    offset: Option<i32>,
}

impl Instant {
    /// Create an instant without an explicit zone.
    #[must_use]
    pub const fn naive(datetime: NaiveDateTime) -> Self {
        Self {
            datetime,
            offset: None,
        }
    }

    /// Create an instant pinned to `offset` seconds east of UTC.
    ///
    /// The offset must be a whole number of minutes, as in RFC 3339.
    pub fn zoned(datetime: NaiveDateTime, offset: i32) -> Result<Self, KifError> {
        if offset.abs() > MAX_UTC_OFFSET_SECONDS {
            return Err(KifError::invalid(
                "Instant::zoned",
                format!("UTC offset {offset}s is out of range"),
            ));
        }
        if offset % 60 != 0 {
            return Err(KifError::invalid(
                "Instant::zoned",
                format!("UTC offset {offset}s is not a whole number of minutes"),
            ));
        }
        Ok(Self {
            datetime,
            offset: Some(offset),
        })
    }

    /// The wall-clock reading.
    #[must_use]
    pub const fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// The explicit UTC offset in seconds, if any.
    #[must_use]
    pub const fn offset(&self) -> Option<i32> {
        self.offset
    }

    /// The UTC reading of a zoned instant.
    fn to_utc(self) -> Option<NaiveDateTime> {
        let offset = TimeDelta::try_seconds(i64::from(self.offset?))?;
        self.datetime.checked_sub_signed(offset)
    }

    /// Check whether `other` denotes this instant.
    ///
    /// When `self` has no zone, `other`'s zone is ignored and the wall-clock
    /// readings are compared. Otherwise both must be zoned and agree in UTC.
    #[must_use]
    pub fn matches(&self, other: &Instant) -> bool {
        match self.offset {
            None => self.datetime == other.datetime,
            Some(_) => other.offset.is_some() && self.to_utc() == other.to_utc(),
        }
    }
}

impl FromStr for Instant {
    type Err = KifError;

    /// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` or an RFC 3339 timestamp.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let literal = s.trim();
        let literal = literal.strip_prefix('+').unwrap_or(literal);
        if let Ok(zoned) = DateTime::parse_from_rfc3339(literal) {
            return Self::zoned(zoned.naive_local(), zoned.offset().local_minus_utc());
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(literal, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Self::naive(datetime));
        }
        if let Ok(date) = NaiveDate::parse_from_str(literal, "%Y-%m-%d") {
            return Ok(Self::naive(date.and_time(NaiveTime::MIN)));
        }
        Err(KifError::invalid(
            "Instant::from_str",
            format!("not a date or datetime: {s:?}"),
        ))
    }
}

impl TryFrom<String> for Instant {
    type Error = KifError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Instant> for String {
    fn from(value: Instant) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datetime.format("%Y-%m-%dT%H:%M:%S"))?;
        if let Some(offset) = self.offset {
            let sign = if offset < 0 { '-' } else { '+' };
            let minutes = offset.unsigned_abs() / 60;
            write!(f, "{sign}{:02}:{:02}", minutes / 60, minutes % 60)?;
        }
        Ok(())
    }
}

// =============================================================================
// TIME
// =============================================================================

/// A time value.
///
/// `timezone` is the zone the value was recorded in, in minutes east of UTC.
/// It is metadata and independent of the instant's own offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Time {
    pub instant: Instant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<TimePrecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<Item>,
}

impl Time {
    /// Create a time with no precision, time zone or calendar.
    #[must_use]
    pub const fn new(instant: Instant) -> Self {
        Self {
            instant,
            precision: None,
            timezone: None,
            calendar: None,
        }
    }

    /// Parse the instant of a new time value.
    pub fn parse(literal: &str) -> Result<Self, KifError> {
        Ok(Self::new(literal.parse()?))
    }

    /// Set the precision.
    #[must_use]
    pub fn with_precision(mut self, precision: TimePrecision) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Set the time zone (minutes east of UTC).
    #[must_use]
    pub fn with_timezone(mut self, timezone: i32) -> Self {
        self.timezone = Some(timezone);
        self
    }

    /// Set the calendar model.
    #[must_use]
    pub fn with_calendar(mut self, calendar: Item) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Check whether `other` satisfies `self` taken as a pattern.
    ///
    /// Unset precision, time zone and calendar in `self` act as wildcards.
    #[must_use]
    pub fn matches(&self, other: &Time) -> bool {
        self.instant.matches(&other.instant)
            && self.precision.is_none_or(|p| other.precision == Some(p))
            && self.timezone.is_none_or(|tz| other.timezone == Some(tz))
            && self
                .calendar
                .as_ref()
                .is_none_or(|cal| other.calendar.as_ref() == Some(cal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> Time {
        Time::parse(s).expect("time")
    }

    #[test]
    fn precision_codes_round_trip() {
        for code in 0..=MAX_TIME_PRECISION {
            let precision = TimePrecision::check(code).expect("precision");
            assert_eq!(precision.code(), code);
        }
        assert!(TimePrecision::check(MAX_TIME_PRECISION + 1).is_err());
        assert_eq!(TimePrecision::check(11).expect("day"), TimePrecision::Day);
    }

    #[test]
    fn parses_date_datetime_and_rfc3339() {
        let date: Instant = "2024-07-11".parse().expect("date");
        assert_eq!(date.offset(), None);
        assert_eq!(date.to_string(), "2024-07-11T00:00:00");

        let naive: Instant = "+2024-07-11T10:30:00".parse().expect("naive");
        assert_eq!(naive.offset(), None);

        let zoned: Instant = "2024-07-11T10:30:00+02:00".parse().expect("zoned");
        assert_eq!(zoned.offset(), Some(7200));
        assert_eq!(zoned.to_string(), "2024-07-11T10:30:00+02:00");

        assert!("yesterday".parse::<Instant>().is_err());
    }

    #[test]
    fn zoneless_pattern_ignores_other_zone() {
        let pattern: Instant = "2024-07-11T10:00:00".parse().expect("pattern");
        let zoned: Instant = "2024-07-11T10:00:00+05:00".parse().expect("zoned");
        assert!(pattern.matches(&zoned));
    }

    #[test]
    fn zoned_pattern_compares_absolute_instants() {
        let pattern: Instant = "2024-07-11T10:00:00+02:00".parse().expect("pattern");
        let same: Instant = "2024-07-11T08:00:00Z".parse().expect("utc");
        let naive: Instant = "2024-07-11T08:00:00".parse().expect("naive");
        assert!(pattern.matches(&same));
        assert!(!pattern.matches(&naive));
    }

    #[test]
    fn unset_fields_are_wildcards() {
        let detailed = time("2024-07-11")
            .with_precision(TimePrecision::BillionYears)
            .with_timezone(1);
        assert!(time("2024-07-11").matches(&detailed));

        let pinned = time("2024-07-11").with_timezone(0);
        assert!(!pinned.matches(&time("2024-07-11")));
        assert!(!time("2024-07-12").matches(&time("2024-07-11")));
    }

    #[test]
    fn out_of_range_offset_rejected() {
        let datetime = NaiveDate::from_ymd_opt(2024, 1, 1)
            .expect("date")
            .and_time(NaiveTime::MIN);
        assert!(Instant::zoned(datetime, 86_400).is_err());
        assert!(Instant::zoned(datetime, -3600).is_ok());
    }

    #[test]
    fn sub_minute_offset_rejected() {
        let datetime = NaiveDate::from_ymd_opt(2024, 7, 11)
            .expect("date")
            .and_time(NaiveTime::MIN);
        let err = Instant::zoned(datetime, 30).expect_err("seconds offset");
        assert!(err.to_string().contains("whole number of minutes"));
        assert!(Instant::zoned(datetime, -5_430).is_err());
    }

    #[test]
    fn zoned_instants_round_trip_through_json() {
        let datetime = NaiveDate::from_ymd_opt(2024, 7, 11)
            .expect("date")
            .and_time(NaiveTime::MIN);
        for offset in [0, 60, -19_800, 20_700, 86_340] {
            let instant = Instant::zoned(datetime, offset).expect("whole minutes");
            let json = serde_json::to_string(&instant).expect("serialize");
            let back: Instant = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, instant, "{json}");
        }
    }
}
