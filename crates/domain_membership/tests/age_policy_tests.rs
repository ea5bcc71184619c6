//! Tests for age computation and derived policy flags

use chrono::NaiveDate;
use core_kernel::Timezone;
use domain_membership::{
    compute_age, AgePolicy, AgeThresholds, MembershipError, RegistrationPath, ADULT,
    MANUAL_REGISTRATION_MIN, PHOTO_PERMISSION_MIN,
};
use proptest::prelude::*;
use test_utils::{aged_birth_date_strategy, birth_date_for_age, TemporalFixtures};

mod boundaries {
    use super::*;

    #[test]
    fn test_exactly_adult_needs_no_approver() {
        let policy = AgePolicy::default();
        let birth = birth_date_for_age(ADULT, TemporalFixtures::today());
        let flags = policy.flags_for(Some(birth), TemporalFixtures::now());
        assert!(!flags.requires_approver_consent);
        assert!(flags.asks_photo_consent);
        assert!(!flags.requires_manual_registration);
    }

    #[test]
    fn test_day_before_adult_birthday() {
        let policy = AgePolicy::default();
        let birth = birth_date_for_age(ADULT, TemporalFixtures::today()).succ_opt().unwrap();
        assert_eq!(policy.age_at(birth, TemporalFixtures::now()), ADULT - 1);
        assert!(policy.flags_for(Some(birth), TemporalFixtures::now()).requires_approver_consent);
    }

    #[test]
    fn test_birthday_reached_by_helsinki_date() {
        let policy = AgePolicy::default();
        let birth = NaiveDate::from_ymd_opt(2011, 6, 1).unwrap();
        assert_eq!(
            policy.registration_path(birth, TemporalFixtures::late_evening_utc()),
            RegistrationPath::Digital
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = AgeThresholds {
            manual_registration_min: 10,
            photo_permission_min: 12,
            adult: 16,
        };
        let policy = AgePolicy::new(thresholds, Timezone::default()).unwrap();
        let flags = policy.derive_flags(16);
        assert!(!flags.requires_approver_consent);
        assert!(!policy.derive_flags(10).requires_manual_registration);
    }

    #[test]
    fn test_zero_adult_age_rejected() {
        let thresholds = AgeThresholds {
            manual_registration_min: 0,
            photo_permission_min: 0,
            adult: 0,
        };
        assert!(matches!(
            thresholds.validate(),
            Err(MembershipError::InvalidThresholds { adult: 0, .. })
        ));
    }
}

proptest! {
    #[test]
    fn prop_generated_birth_dates_have_expected_age((age, birth) in aged_birth_date_strategy(TemporalFixtures::today())) {
        prop_assert_eq!(compute_age(birth, TemporalFixtures::today()), age);
    }

    #[test]
    fn prop_approver_required_exactly_below_adult((age, birth) in aged_birth_date_strategy(TemporalFixtures::today())) {
        let flags = AgePolicy::default().flags_for(Some(birth), TemporalFixtures::now());
        prop_assert_eq!(flags.requires_approver_consent, age < ADULT);
    }

    #[test]
    fn prop_manual_registration_below_minimum((age, birth) in aged_birth_date_strategy(TemporalFixtures::today())) {
        let policy = AgePolicy::default();
        let flags = policy.flags_for(Some(birth), TemporalFixtures::now());
        prop_assert_eq!(flags.requires_manual_registration, age < MANUAL_REGISTRATION_MIN);
        prop_assert_eq!(flags.asks_photo_consent, age >= PHOTO_PERMISSION_MIN);
        let expected = if age < MANUAL_REGISTRATION_MIN {
            RegistrationPath::Manual
        } else {
            RegistrationPath::Digital
        };
        prop_assert_eq!(policy.registration_path(birth, TemporalFixtures::now()), expected);
    }

    #[test]
    fn prop_ordered_thresholds_give_consistent_flags(
        manual in 0u32..20,
        photo_gap in 0u32..5,
        adult_gap in 1u32..5,
        age in 0u32..40,
    ) {
        let thresholds = AgeThresholds {
            manual_registration_min: manual,
            photo_permission_min: manual + photo_gap,
            adult: manual + photo_gap + adult_gap,
        };
        let flags = AgePolicy::new(thresholds, Timezone::default()).unwrap().derive_flags(age);
        // manual registration always implies a guardian
        prop_assert!(!flags.requires_manual_registration || flags.requires_approver_consent);
        prop_assert!(!flags.requires_manual_registration || !flags.asks_photo_consent);
    }
}
