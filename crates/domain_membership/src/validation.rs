//! Field validation primitives
//!
//! Errors are symbolic: each failing field path maps to one [`ErrorKind`] and
//! the presentation layer renders the localized text.
//!
//! # Address rules
//!
//! - `address`, `city`: 2-255 characters
//! - `postalCode`: per [`validate_postal_code`]
//! - `countryCode`: must be known to the country catalogue, when one is given
//!
//! Required entries report `required` for empty fields. Optional entries
//! accept empty `address` and `city` but always have their postal code checked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::address::Address;
use crate::ports::CountryCatalog;
use crate::postal_code::validate_postal_code;

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 255;
pub const ADDRESS_MIN: usize = 2;
pub const ADDRESS_MAX: usize = 255;

/// Symbolic validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Required,
    TooShort,
    TooLong,
    InvalidValue,
    InvalidEmail,
}

/// An error on a single field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn new(path: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Field path to error kind, one entry per path
///
/// The first error recorded for a path is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: BTreeMap<String, ErrorKind>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error unless the path already has one
    pub fn add(&mut self, path: impl Into<String>, kind: ErrorKind) {
        self.errors.entry(path.into()).or_insert(kind);
    }

    pub fn add_error(&mut self, error: FieldError) {
        self.add(error.path, error.kind);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = FieldError>) {
        for error in errors {
            self.add_error(error);
        }
    }

    /// Merges another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        for (path, kind) in other.errors {
            self.add(path, kind);
        }
    }

    pub fn get(&self, path: &str) -> Option<ErrorKind> {
        self.errors.get(path).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ErrorKind)> {
        self.errors.iter().map(|(path, kind)| (path.as_str(), *kind))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a text value against length bounds
///
/// Whitespace-only input counts as empty. Lengths are in characters.
pub fn check_text(value: &str, min: usize, max: usize, required: bool) -> Option<ErrorKind> {
    let value = value.trim();
    if value.is_empty() {
        return required.then_some(ErrorKind::Required);
    }
    let length = value.chars().count();
    if length < min {
        Some(ErrorKind::TooShort)
    } else if length > max {
        Some(ErrorKind::TooLong)
    } else {
        None
    }
}

/// Checks an email address; empty is only an error when required
pub fn check_email(value: &str, required: bool) -> Option<ErrorKind> {
    let value = value.trim();
    if value.is_empty() {
        return required.then_some(ErrorKind::Required);
    }
    if value.to_string().validate_email() {
        None
    } else {
        Some(ErrorKind::InvalidEmail)
    }
}

/// Whether an address entry must be filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRequirement {
    Required,
    Optional,
}

impl AddressRequirement {
    fn is_required(self) -> bool {
        matches!(self, AddressRequirement::Required)
    }
}

/// Validates address entries
pub struct AddressValidator;

impl AddressValidator {
    /// Validates one address, reporting paths under `prefix`
    pub fn validate_address(
        address: &Address,
        prefix: &str,
        requirement: AddressRequirement,
        countries: Option<&dyn CountryCatalog>,
    ) -> Vec<FieldError> {
        let required = requirement.is_required();
        let mut errors = Vec::new();
        let path = |field: &str| format!("{prefix}.{field}");

        if let Some(kind) = check_text(&address.address, ADDRESS_MIN, ADDRESS_MAX, required) {
            errors.push(FieldError::new(path("address"), kind));
        }

        let postal_code = address.postal_code.trim();
        if postal_code.is_empty() && required {
            errors.push(FieldError::new(path("postalCode"), ErrorKind::Required));
        } else if !validate_postal_code(postal_code, address.effective_country_code()).is_valid() {
            errors.push(FieldError::new(path("postalCode"), ErrorKind::InvalidValue));
        }

        if let Some(kind) = check_text(&address.city, ADDRESS_MIN, ADDRESS_MAX, required) {
            errors.push(FieldError::new(path("city"), kind));
        }

        let country_code = address.country_code.trim();
        if country_code.is_empty() {
            if required {
                errors.push(FieldError::new(path("countryCode"), ErrorKind::Required));
            }
        } else if let Some(catalog) = countries {
            if !catalog.is_known(country_code) {
                errors.push(FieldError::new(path("countryCode"), ErrorKind::InvalidValue));
            }
        }

        errors
    }
}
