//! Country-specific postal code rules
//!
//! Countries with a registered pattern are checked against it. Every other
//! country falls back to the generic rule: any non-empty value shorter than
//! [`GENERIC_POSTAL_CODE_MAX`] characters.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Exclusive upper bound on the length of a postal code without a country rule
pub const GENERIC_POSTAL_CODE_MAX: usize = 32;

const COUNTRY_PATTERNS: &[(&str, &str)] = &[
    ("FI", r"^[0-9]{5}$"),
    ("AX", r"^22[0-9]{3}$"),
    ("SE", r"^[0-9]{3} ?[0-9]{2}$"),
    ("NO", r"^[0-9]{4}$"),
    ("DK", r"^[0-9]{4}$"),
    ("IS", r"^[0-9]{3}$"),
    ("EE", r"^[0-9]{5}$"),
    ("LV", r"^(LV-)?[0-9]{4}$"),
    ("LT", r"^(LT-)?[0-9]{5}$"),
    ("DE", r"^[0-9]{5}$"),
    ("AT", r"^[0-9]{4}$"),
    ("CH", r"^[0-9]{4}$"),
    ("FR", r"^[0-9]{2} ?[0-9]{3}$"),
    ("IT", r"^[0-9]{5}$"),
    ("ES", r"^[0-9]{5}$"),
    ("NL", r"^[0-9]{4} ?[A-Za-z]{2}$"),
    ("BE", r"^[0-9]{4}$"),
    ("PL", r"^[0-9]{2}-[0-9]{3}$"),
    ("GB", r"^[A-Za-z]{1,2}[0-9][A-Za-z0-9]? ?[0-9][A-Za-z]{2}$"),
    ("IE", r"^[A-Za-z][0-9][0-9Ww] ?[A-Za-z0-9]{4}$"),
    ("US", r"^[0-9]{5}(-[0-9]{4})?$"),
    ("CA", r"^[ABCEGHJ-NPRSTVXYabceghj-nprstvxy][0-9][A-Za-z] ?[0-9][A-Za-z][0-9]$"),
    ("RU", r"^[0-9]{6}$"),
    ("JP", r"^[0-9]{3}-?[0-9]{4}$"),
];

static COUNTRY_RULES: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    COUNTRY_PATTERNS
        .iter()
        .map(|(code, pattern)| {
            (*code, Regex::new(pattern).expect("postal code patterns are valid"))
        })
        .collect()
});

/// Outcome of a postal code check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostalCodeVerdict {
    Valid,
    Invalid,
}

impl PostalCodeVerdict {
    pub fn is_valid(self) -> bool {
        matches!(self, PostalCodeVerdict::Valid)
    }
}

impl From<bool> for PostalCodeVerdict {
    fn from(valid: bool) -> Self {
        if valid {
            PostalCodeVerdict::Valid
        } else {
            PostalCodeVerdict::Invalid
        }
    }
}

/// Whether a dedicated rule exists for the country
pub fn has_country_rule(country_code: &str) -> bool {
    COUNTRY_RULES.contains_key(country_code.trim().to_ascii_uppercase().as_str())
}

/// Checks a postal code against the rule for `country_code`
pub fn validate_postal_code(postal_code: &str, country_code: &str) -> PostalCodeVerdict {
    let value = postal_code.trim();
    let country = country_code.trim().to_ascii_uppercase();
    match COUNTRY_RULES.get(country.as_str()) {
        Some(rule) => rule.is_match(value).into(),
        None => (!value.is_empty() && value.chars().count() < GENERIC_POSTAL_CODE_MAX).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finnish_codes() {
        assert!(validate_postal_code("00990", "FI").is_valid());
        assert!(validate_postal_code(" 00100 ", "fi").is_valid());
        assert!(!validate_postal_code("", "FI").is_valid());
        assert!(!validate_postal_code("0099", "FI").is_valid());
        assert!(!validate_postal_code("00990a", "FI").is_valid());
    }

    #[test]
    fn test_other_registered_countries() {
        assert!(validate_postal_code("114 55", "SE").is_valid());
        assert!(validate_postal_code("11455", "SE").is_valid());
        assert!(validate_postal_code("SW1A 1AA", "GB").is_valid());
        assert!(validate_postal_code("K1A 0B1", "CA").is_valid());
        assert!(!validate_postal_code("D1A 0B1", "CA").is_valid());
        assert!(validate_postal_code("12345-6789", "US").is_valid());
        assert!(!validate_postal_code("1234", "DE").is_valid());
    }

    #[test]
    fn test_generic_fallback() {
        assert!(!has_country_rule("ZZ"));
        assert!(validate_postal_code("anything goes", "ZZ").is_valid());
        assert!(validate_postal_code(&"9".repeat(31), "ZZ").is_valid());
        assert!(!validate_postal_code(&"9".repeat(32), "ZZ").is_valid());
        assert!(!validate_postal_code("", "ZZ").is_valid());
    }

    #[test]
    fn test_every_pattern_compiles() {
        assert_eq!(COUNTRY_RULES.len(), COUNTRY_PATTERNS.len());
    }
}
