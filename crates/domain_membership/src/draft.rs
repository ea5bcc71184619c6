//! Editable form state
//!
//! [`Draft::from_profile`] is the only place where absent profile values are
//! replaced by defaults; everything downstream works on a fully populated
//! draft.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::address::{Address, DEFAULT_COUNTRY_CODE};
use crate::address_list::AddressList;
use crate::profile::{Language, Profile, YouthLanguage};

/// Answer to the photo-usage question
///
/// On the wire this is the tri-state form value `""`, `"true"` or `"false"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PhotoConsent {
    #[default]
    Unanswered,
    Yes,
    No,
}

/// A form value that is not one of the three consent states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidConsentValue(pub String);

impl fmt::Display for InvalidConsentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid photo consent value: {:?}", self.0)
    }
}

impl PhotoConsent {
    pub fn from_form_value(value: &str) -> Result<Self, InvalidConsentValue> {
        match value.trim() {
            "" => Ok(PhotoConsent::Unanswered),
            "true" => Ok(PhotoConsent::Yes),
            "false" => Ok(PhotoConsent::No),
            other => Err(InvalidConsentValue(other.to_string())),
        }
    }

    pub fn as_form_value(&self) -> &'static str {
        match self {
            PhotoConsent::Unanswered => "",
            PhotoConsent::Yes => "true",
            PhotoConsent::No => "false",
        }
    }

    /// Persisted value; anything but an explicit yes is stored as `false`
    pub fn as_bool(&self) -> bool {
        matches!(self, PhotoConsent::Yes)
    }

    /// Consent loaded from a stored profile, defaulting to `No`
    pub fn from_stored(value: Option<bool>) -> Self {
        match value {
            Some(true) => PhotoConsent::Yes,
            _ => PhotoConsent::No,
        }
    }

    pub fn is_answered(&self) -> bool {
        !matches!(self, PhotoConsent::Unanswered)
    }
}

impl TryFrom<String> for PhotoConsent {
    type Error = InvalidConsentValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_form_value(&value)
    }
}

impl From<PhotoConsent> for String {
    fn from(consent: PhotoConsent) -> Self {
        consent.as_form_value().to_string()
    }
}

/// Defaults applied when a value is absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftDefaults {
    pub country_code: String,
    pub language: Language,
    pub language_at_home: YouthLanguage,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            language: Language::Finnish,
            language_at_home: YouthLanguage::Finnish,
        }
    }
}

impl DraftDefaults {
    fn normalize_address(&self, mut address: Address) -> Address {
        if address.country_code.trim().is_empty() {
            address.country_code = self.country_code.clone();
        }
        address
    }
}

/// The in-progress form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    pub first_name: String,
    pub last_name: String,
    /// Shown read-only; not part of any request
    pub email: String,
    pub phone: String,
    #[serde(flatten)]
    pub address_list: AddressList,
    pub birth_date: Option<NaiveDate>,
    pub school_name: String,
    pub school_class: String,
    pub approver_first_name: String,
    pub approver_last_name: String,
    pub approver_phone: String,
    pub approver_email: String,
    pub profile_language: Language,
    pub language_at_home: YouthLanguage,
    pub photo_usage_approved: PhotoConsent,
    #[serde(rename = "terms")]
    pub terms_accepted: bool,
}

impl Draft {
    /// Blank draft for the creation flow
    pub fn empty(defaults: &DraftDefaults) -> Self {
        Self {
            address_list: AddressList::new(Address::blank(defaults.country_code.clone())),
            profile_language: defaults.language,
            language_at_home: defaults.language_at_home,
            photo_usage_approved: PhotoConsent::No,
            terms_accepted: false,
            ..Self::default()
        }
    }

    /// Draft seeded from a stored profile for the edit flow
    pub fn from_profile(profile: &Profile, defaults: &DraftDefaults) -> Self {
        let youth = &profile.youth_profile;
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        let primary = profile
            .primary_address
            .clone()
            .unwrap_or_else(|| Address::blank(defaults.country_code.clone()));
        let address_list = AddressList::new(defaults.normalize_address(primary)).with_secondaries(
            profile
                .secondary_addresses()
                .cloned()
                .map(|address| defaults.normalize_address(address)),
        );

        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile
                .primary_email
                .as_ref()
                .map(|e| e.email.clone())
                .unwrap_or_default(),
            phone: profile
                .primary_phone
                .as_ref()
                .map(|p| p.phone.clone())
                .unwrap_or_default(),
            address_list,
            birth_date: youth.birth_date,
            school_name: text(&youth.school_name),
            school_class: text(&youth.school_class),
            approver_first_name: text(&youth.approver_first_name),
            approver_last_name: text(&youth.approver_last_name),
            approver_phone: text(&youth.approver_phone),
            approver_email: text(&youth.approver_email),
            profile_language: profile.language.unwrap_or(defaults.language),
            language_at_home: youth.language_at_home.unwrap_or(defaults.language_at_home),
            photo_usage_approved: PhotoConsent::from_stored(youth.photo_usage_approved),
            terms_accepted: true,
        }
    }

    pub fn primary_address(&self) -> &Address {
        self.address_list.primary()
    }
}
