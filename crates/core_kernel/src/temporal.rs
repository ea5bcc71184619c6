//! Time handling for age-dependent rules
//!
//! Ages are computed from the calendar date in the service's local timezone,
//! not from the UTC date: a person born in Helsinki turns 18 at local
//! midnight. The `Clock` trait makes the reference instant explicit so rule
//! evaluation stays deterministic under test.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Timezone wrapper for the service's local calendar
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timezone::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name such as `Europe/Helsinki`
    pub fn parse(name: &str) -> Result<Self, TemporalError> {
        Tz::from_str(name)
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(name.to_string()))
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Returns the local calendar date of an instant
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        self.to_local(utc).date_naive()
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Europe::Helsinki)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Date {date} is after the reference date {reference}")]
    FutureDate {
        date: NaiveDate,
        reference: NaiveDate,
    },
}

/// Source of the reference instant for age computation
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Rejects dates that lie after the reference date
pub fn ensure_not_future(date: NaiveDate, reference: NaiveDate) -> Result<NaiveDate, TemporalError> {
    if date > reference {
        return Err(TemporalError::FutureDate { date, reference });
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_crosses_midnight() {
        // 22:30 UTC on 31 Dec is already 1 Jan in Helsinki (UTC+2 in winter)
        let instant = Utc.with_ymd_and_hms(2023, 12, 31, 22, 30, 0).unwrap();
        let tz = Timezone::default();
        assert_eq!(tz.local_date(instant), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(Timezone::parse("UTC").unwrap().local_date(instant).to_string(), "2023-12-31");
    }

    #[test]
    fn test_parse_rejects_unknown_zone() {
        assert_eq!(
            Timezone::parse("Mars/Olympus"),
            Err(TemporalError::InvalidTimezone("Mars/Olympus".to_string()))
        );
    }

    #[test]
    fn test_fixed_clock() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(FixedClock::at(instant).now(), instant);
    }

    #[test]
    fn test_ensure_not_future() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert!(ensure_not_future(today, today).is_ok());
        assert!(matches!(
            ensure_not_future(tomorrow, today),
            Err(TemporalError::FutureDate { .. })
        ));
    }
}
