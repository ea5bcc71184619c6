//! Stored youth profile snapshot
//!
//! The remote profile store owns these records. The engine only ever holds a
//! read-only copy of what was loaded; edits go through a [`Draft`] and come
//! back as an update request.
//!
//! [`Draft`]: crate::draft::Draft

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unic_langid::{langid, LanguageIdentifier};

use core_kernel::{EmailId, PhoneId, ProfileId};

use crate::address::Address;

/// Language used for communication with the member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    #[default]
    Finnish,
    Swedish,
    English,
}

impl Language {
    /// Locale used for looking up localized names
    pub fn locale(&self) -> LanguageIdentifier {
        match self {
            Language::Finnish => langid!("fi"),
            Language::Swedish => langid!("sv"),
            Language::English => langid!("en"),
        }
    }

    /// Maps a negotiated locale back to a supported language
    pub fn from_locale(locale: &LanguageIdentifier) -> Option<Self> {
        match locale.language.as_str() {
            "fi" => Some(Language::Finnish),
            "sv" => Some(Language::Swedish),
            "en" => Some(Language::English),
            _ => None,
        }
    }

    pub fn all() -> [Language; 3] {
        [Language::Finnish, Language::Swedish, Language::English]
    }
}

/// Language spoken at home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum YouthLanguage {
    #[default]
    Finnish,
    Swedish,
    English,
}

/// Phone classification used by the profile store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneType {
    Home,
    Work,
    Mobile,
    #[default]
    Other,
}

/// Primary email relation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Email {
    pub id: Option<EmailId>,
    pub email: String,
}

/// Primary phone relation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Phone {
    pub id: Option<PhoneId>,
    pub phone: String,
    pub phone_type: PhoneType,
}

/// Youth-specific part of a profile
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YouthProfile {
    pub birth_date: Option<NaiveDate>,
    pub school_name: Option<String>,
    pub school_class: Option<String>,
    pub approver_first_name: Option<String>,
    pub approver_last_name: Option<String>,
    pub approver_phone: Option<String>,
    pub approver_email: Option<String>,
    pub language_at_home: Option<YouthLanguage>,
    pub photo_usage_approved: Option<bool>,
}

/// A profile as loaded from the store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub id: Option<ProfileId>,
    pub first_name: String,
    pub last_name: String,
    pub language: Option<Language>,
    pub primary_email: Option<Email>,
    pub primary_phone: Option<Phone>,
    pub primary_address: Option<Address>,
    /// Every address on the profile; may include the primary one again
    pub addresses: Vec<Address>,
    pub youth_profile: YouthProfile,
}

impl Profile {
    /// Returns the full display name
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Addresses other than the primary one, in stored order
    pub fn secondary_addresses(&self) -> impl Iterator<Item = &Address> {
        let primary_id = self.primary_address.as_ref().and_then(|a| a.id.as_ref());
        self.addresses.iter().filter(move |address| {
            !address.is_primary && (primary_id.is_none() || address.id.as_ref() != primary_id)
        })
    }
}
