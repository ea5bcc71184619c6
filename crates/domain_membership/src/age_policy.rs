//! Age-derived policy flags
//!
//! All age-dependent behaviour of the registration flow hangs off three
//! thresholds:
//!
//! - below `manual_registration_min` the applicant cannot register digitally
//!   and must be sent to the paper form
//! - from `photo_permission_min` the photo-usage question is asked
//! - from `adult` the applicant approves their own membership and the
//!   approver (guardian) fields become optional
//!
//! Thresholds are inclusive lower bounds: an applicant whose age equals a
//! threshold meets it.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::Timezone;

use crate::error::MembershipError;

/// Age below which only manual registration is possible
pub const MANUAL_REGISTRATION_MIN: u32 = 13;
/// Age from which the photo-usage consent is asked
pub const PHOTO_PERMISSION_MIN: u32 = 15;
/// Age from which no guardian approval is needed
pub const ADULT: u32 = 18;

/// The three age thresholds of the registration flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeThresholds {
    pub manual_registration_min: u32,
    pub photo_permission_min: u32,
    pub adult: u32,
}

impl Default for AgeThresholds {
    fn default() -> Self {
        Self {
            manual_registration_min: MANUAL_REGISTRATION_MIN,
            photo_permission_min: PHOTO_PERMISSION_MIN,
            adult: ADULT,
        }
    }
}

impl AgeThresholds {
    /// Checks `manual_registration_min <= photo_permission_min <= adult`
    ///
    /// With any other ordering the derived flags contradict each other, e.g.
    /// an applicant could need manual registration while already counting as
    /// an adult.
    pub fn validate(&self) -> Result<(), MembershipError> {
        let ordered = self.manual_registration_min <= self.photo_permission_min
            && self.photo_permission_min <= self.adult;
        if !ordered || self.adult == 0 {
            return Err(MembershipError::InvalidThresholds {
                manual_registration_min: self.manual_registration_min,
                photo_permission_min: self.photo_permission_min,
                adult: self.adult,
            });
        }
        Ok(())
    }
}

/// Flags derived from an applicant's age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeFlags {
    pub requires_manual_registration: bool,
    pub requires_approver_consent: bool,
    pub asks_photo_consent: bool,
}

impl AgeFlags {
    /// Flags used while no birth date is known
    ///
    /// Guardian approval is required and the photo question stays hidden
    /// until the age is known.
    pub fn unknown() -> Self {
        Self {
            requires_manual_registration: false,
            requires_approver_consent: true,
            asks_photo_consent: false,
        }
    }
}

/// Which registration path an applicant may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationPath {
    /// Online registration form
    Digital,
    /// Paper form or a visit to a youth centre
    Manual,
}

/// Age in whole years on `today`
///
/// Calendar-year difference corrected by month and day, so the age increases
/// on the birthday itself. A 29 February birthday is reached on 1 March in
/// non-leap years. Birth dates after `today` give 0.
pub fn compute_age(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    if birth_date >= today {
        return 0;
    }
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// Derives policy flags from birth dates
#[derive(Debug, Clone, Copy)]
pub struct AgePolicy {
    thresholds: AgeThresholds,
    timezone: Timezone,
}

impl Default for AgePolicy {
    fn default() -> Self {
        Self {
            thresholds: AgeThresholds::default(),
            timezone: Timezone::default(),
        }
    }
}

impl AgePolicy {
    /// Creates a policy, refusing inconsistent thresholds
    pub fn new(thresholds: AgeThresholds, timezone: Timezone) -> Result<Self, MembershipError> {
        thresholds.validate()?;
        Ok(Self { thresholds, timezone })
    }

    pub fn thresholds(&self) -> AgeThresholds {
        self.thresholds
    }

    /// Local calendar date of `now` in the policy's timezone
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.timezone.local_date(now)
    }

    /// Age in whole years at the instant `now`
    pub fn age_at(&self, birth_date: NaiveDate, now: DateTime<Utc>) -> u32 {
        compute_age(birth_date, self.today(now))
    }

    pub fn derive_flags(&self, age: u32) -> AgeFlags {
        AgeFlags {
            requires_manual_registration: age < self.thresholds.manual_registration_min,
            requires_approver_consent: age < self.thresholds.adult,
            asks_photo_consent: age >= self.thresholds.photo_permission_min,
        }
    }

    /// Flags for an optional birth date; see [`AgeFlags::unknown`]
    pub fn flags_for(&self, birth_date: Option<NaiveDate>, now: DateTime<Utc>) -> AgeFlags {
        match birth_date {
            Some(date) => self.derive_flags(self.age_at(date, now)),
            None => AgeFlags::unknown(),
        }
    }

    /// Decides between the digital and the manual registration path
    pub fn registration_path(&self, birth_date: NaiveDate, now: DateTime<Utc>) -> RegistrationPath {
        if self.derive_flags(self.age_at(birth_date, now)).requires_manual_registration {
            RegistrationPath::Manual
        } else {
            RegistrationPath::Digital
        }
    }
}
