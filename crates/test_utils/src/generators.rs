//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating birth dates, postal codes and
//! country codes.

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;

/// Latest birth date giving exactly `age` on `today`
///
/// A 29 February `today` maps to 28 February in non-leap birth years.
pub fn birth_date_for_age(age: u32, today: NaiveDate) -> NaiveDate {
    let year = today.year() - age as i32;
    today
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
        .expect("valid birth date")
}

/// Strategy for ages from newborn to well past adulthood
pub fn age_strategy() -> impl Strategy<Value = u32> {
    0u32..40
}

/// Strategy for `(age, birth_date)` pairs consistent on `today`
///
/// The birth date is anywhere within the year before the `age` birthday.
pub fn aged_birth_date_strategy(today: NaiveDate) -> impl Strategy<Value = (u32, NaiveDate)> {
    (age_strategy(), 0i64..365).prop_map(move |(age, offset)| {
        (age, birth_date_for_age(age, today) - Duration::days(offset))
    })
}

/// Strategy for five-digit Finnish postal codes
pub fn finnish_postal_code_strategy() -> impl Strategy<Value = String> {
    "[0-9]{5}"
}

/// Strategy for postal codes accepted by the generic rule
pub fn generic_postal_code_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 -]{0,30}"
}

/// Strategy for country codes with no dedicated postal code rule
pub fn unregistered_country_strategy() -> impl Strategy<Value = String> {
    "(X|Q)[A-Z]"
}
