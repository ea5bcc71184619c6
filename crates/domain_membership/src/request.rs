//! Requests sent to the profile store
//!
//! `addressType` and `phoneType` are always `OTHER`; the form does not ask
//! for them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{AddressId, PhoneId};

use crate::address::AddressType;
use crate::profile::{Language, PhoneType, YouthLanguage};

/// Update of an existing profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub profile: UpdateProfileInput,
    pub youth_profile: YouthProfileInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub language: Language,
    /// Slot 0 is the primary address, `null` when it cannot be updated
    pub update_addresses: Vec<Option<AddressUpdate>>,
    /// The primary phone, `null` when it cannot be updated
    pub update_phones: Vec<Option<PhoneUpdate>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub address_type: AddressType,
    pub primary: bool,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PhoneId>,
    pub phone: String,
    pub phone_type: PhoneType,
    pub primary: bool,
}

/// Youth fields, always sent in full
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouthProfileInput {
    pub birth_date: Option<NaiveDate>,
    pub school_name: String,
    pub school_class: String,
    pub approver_first_name: String,
    pub approver_last_name: String,
    pub approver_phone: String,
    pub approver_email: String,
    pub language_at_home: YouthLanguage,
    pub photo_usage_approved: bool,
}

/// Creation of a new profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub profile: CreateProfileInput,
    pub youth_profile: YouthProfileInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub language: Language,
    pub add_addresses: Vec<AddressInput>,
    pub add_phones: Vec<PhoneInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub address_type: AddressType,
    pub primary: bool,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneInput {
    pub phone: String,
    pub phone_type: PhoneType,
    pub primary: bool,
}
