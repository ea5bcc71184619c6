//! Pre-built Test Fixtures
//!
//! Ready-to-use profiles, addresses and reference instants. Ages in the
//! profile fixtures are relative to [`TemporalFixtures::now`].

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::FixedClock;
use domain_membership::{Address, Email, Language, Phone, PhoneType, Profile, YouthProfile};

use crate::generators::birth_date_for_age;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Reference instant: 1 June 2024, noon in Helsinki
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    /// Helsinki calendar date of [`Self::now`]
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    pub fn clock() -> FixedClock {
        FixedClock::at(Self::now())
    }

    /// 21:30 UTC on 31 May 2024, already 1 June in Helsinki
    pub fn late_evening_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 31, 21, 30, 0).unwrap()
    }
}

/// Fixture for address test data
pub struct AddressFixtures;

impl AddressFixtures {
    /// Stored primary address with id `A1`
    pub fn stored_primary() -> Address {
        Address::new("Mannerheimintie 5", "00100", "Helsinki", "FI")
            .with_id("A1")
            .primary()
    }

    /// Stored secondary address with id `A2`
    pub fn stored_secondary() -> Address {
        Address::new("Aurakatu 8", "20100", "Turku", "FI").with_id("A2")
    }

    pub fn test_address() -> Address {
        Address::new("TestAddress", "12345", "Helsinki", "FI").primary()
    }

    pub fn swedish() -> Address {
        Address::new("Drottninggatan 1", "111 51", "Stockholm", "SE")
    }
}

/// Fixture for profile test data
pub struct ProfileFixtures;

impl ProfileFixtures {
    /// Stored profile of an applicant aged `age`, with every relation present
    pub fn aged(age: u32) -> Profile {
        let primary = AddressFixtures::stored_primary();
        Profile {
            id: Some("UHJvZmlsZU5vZGU6MQ==".into()),
            first_name: "Aino".to_string(),
            last_name: "Virtanen".to_string(),
            language: Some(Language::Finnish),
            primary_email: Some(Email {
                id: Some("E1".into()),
                email: "aino.virtanen@example.fi".to_string(),
            }),
            primary_phone: Some(Phone {
                id: Some("T1".into()),
                phone: "0401234567".to_string(),
                phone_type: PhoneType::Mobile,
            }),
            primary_address: Some(primary.clone()),
            addresses: vec![primary],
            youth_profile: YouthProfile {
                birth_date: Some(birth_date_for_age(age, TemporalFixtures::today())),
                school_name: Some("Kallion lukio".to_string()),
                school_class: Some("2B".to_string()),
                approver_first_name: Some("Pirjo".to_string()),
                approver_last_name: Some("Virtanen".to_string()),
                approver_phone: Some("0501234567".to_string()),
                approver_email: Some("pirjo.virtanen@example.fi".to_string()),
                language_at_home: None,
                photo_usage_approved: Some(false),
            },
        }
    }

    /// Adult applicant (20)
    pub fn adult() -> Profile {
        Self::aged(20)
    }

    /// Minor applicant (16) who is asked the photo question
    pub fn minor() -> Profile {
        Self::aged(16)
    }

    /// Profile whose primary relations were never created
    pub fn without_relations() -> Profile {
        Profile {
            primary_address: None,
            primary_phone: None,
            addresses: Vec::new(),
            ..Self::adult()
        }
    }

    /// Profile with the given primary address and nothing else
    pub fn with_primary_address(address: Address) -> Profile {
        Profile {
            primary_address: Some(address),
            ..Profile::default()
        }
    }
}
