//! Address types and display formatting

use serde::{Deserialize, Serialize};

use core_kernel::AddressId;

use crate::ports::CountryCatalog;
use crate::profile::{Language, Profile};

/// Country used whenever an address carries no country code
pub const DEFAULT_COUNTRY_CODE: &str = "FI";

/// Address type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressType {
    Home,
    Work,
    #[default]
    Other,
}

/// A postal address
///
/// `id` is only present for addresses loaded from the profile store; an
/// address without one is new.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub id: Option<AddressId>,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country_code: String,
    #[serde(rename = "primary")]
    pub is_primary: bool,
    pub address_type: AddressType,
}

impl Address {
    /// Creates a new, not yet stored address
    pub fn new(
        address: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            address: address.into(),
            postal_code: postal_code.into(),
            city: city.into(),
            country_code: country_code.into(),
            is_primary: false,
            address_type: AddressType::Other,
        }
    }

    /// Empty address in the given country
    pub fn blank(country_code: impl Into<String>) -> Self {
        Self::new("", "", "", country_code)
    }

    pub fn with_id(mut self, id: impl Into<AddressId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    /// Whether the address was loaded from the store
    pub fn is_stored(&self) -> bool {
        self.id.is_some()
    }

    /// True when nothing was entered beyond the defaults of a new entry
    pub fn is_blank_beyond_defaults(&self, default_country: &str) -> bool {
        self.address.trim().is_empty()
            && self.postal_code.trim().is_empty()
            && self.city.trim().is_empty()
            && (self.country_code.is_empty() || self.country_code.eq_ignore_ascii_case(default_country))
    }

    /// Country code, falling back to [`DEFAULT_COUNTRY_CODE`] when empty
    pub fn effective_country_code(&self) -> &str {
        if self.country_code.trim().is_empty() {
            DEFAULT_COUNTRY_CODE
        } else {
            &self.country_code
        }
    }

    /// Formats the address as `street, postal city` followed by the country name
    ///
    /// Empty components are kept so the separators stay in place.
    pub fn format(&self, country_name: &str) -> String {
        format!(
            "{}, {} {}\n{}",
            self.address, self.postal_code, self.city, country_name
        )
    }
}

/// Formats a profile's primary address for display
///
/// Returns an empty string when the profile has no primary address. Unknown
/// country codes are shown as the code itself.
pub fn format_primary_address(
    profile: &Profile,
    countries: &dyn CountryCatalog,
    language: Language,
) -> String {
    let Some(address) = profile.primary_address.as_ref() else {
        return String::new();
    };
    let code = address.effective_country_code();
    let country = countries
        .country_name(code, language)
        .unwrap_or_else(|| code.to_string());
    address.format(&country)
}
