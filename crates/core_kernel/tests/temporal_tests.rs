//! Tests for clock and timezone handling

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use core_kernel::temporal::ensure_not_future;
use core_kernel::{Clock, FixedClock, SystemClock, TemporalError, Timezone};
use proptest::prelude::*;

mod timezone {
    use super::*;

    #[test]
    fn test_default_is_helsinki() {
        assert_eq!(Timezone::default().name(), "Europe/Helsinki");
    }

    #[test]
    fn test_summer_offset_moves_local_date() {
        // Helsinki is UTC+3 in summer
        let instant = Utc.with_ymd_and_hms(2024, 6, 14, 21, 0, 0).unwrap();
        assert_eq!(
            Timezone::default().local_date(instant),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
    }

    #[test]
    fn test_serde_uses_iana_name() {
        let tz = Timezone::parse("Europe/Stockholm").unwrap();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"Europe/Stockholm\"");

        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tz);
        assert!(serde_json::from_str::<Timezone>("\"Nowhere/Town\"").is_err());
    }
}

mod clocks {
    use super::*;

    #[test]
    fn test_fixed_clock_never_moves() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let clock = FixedClock::at(instant);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_system_clock_is_close_to_now() {
        let before = Utc::now();
        let observed = SystemClock.now();
        assert!(observed >= before);
        assert!(observed - before < Duration::seconds(5));
    }

    #[test]
    fn test_future_date_error_carries_both_dates() {
        let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(
            ensure_not_future(date, reference),
            Err(TemporalError::FutureDate { date, reference })
        );
    }
}

proptest! {
    #[test]
    fn prop_utc_local_date_matches_utc_date(secs in 0i64..4_000_000_000i64) {
        let instant = Utc.timestamp_opt(secs, 0).unwrap();
        let tz = Timezone::parse("UTC").unwrap();
        prop_assert_eq!(tz.local_date(instant), instant.date_naive());
    }

    #[test]
    fn prop_helsinki_is_never_behind_utc(secs in 0i64..4_000_000_000i64) {
        let instant = Utc.timestamp_opt(secs, 0).unwrap();
        prop_assert!(Timezone::default().local_date(instant) >= instant.date_naive());
    }
}
