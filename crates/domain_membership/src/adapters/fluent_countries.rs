//! Country catalogue backed by embedded Fluent resources
//!
//! Every locale ships a `countries.ftl` with one `country-<CODE>` message per
//! country. The resources are formatted once at construction; lookups only
//! negotiate the locale and read the formatted names.

use std::collections::{BTreeMap, HashMap};

use fluent::{FluentBundle, FluentResource};
use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use tracing::debug;
use unic_langid::{langid, LanguageIdentifier};

use crate::error::MembershipError;
use crate::ports::CountryCatalog;
use crate::profile::Language;

/// ISO 3166-1 alpha-2 codes; every bundled resource defines each of them
pub const COUNTRY_CODES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX",
    "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
    "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK",
    "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN",
    "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV",
    "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
    "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI",
    "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC",
    "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR",
    "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

const RESOURCES: &[(&str, &str)] = &[
    ("fi", include_str!("../../locales/fi/countries.ftl")),
    ("sv", include_str!("../../locales/sv/countries.ftl")),
    ("en", include_str!("../../locales/en/countries.ftl")),
];

/// Localized country names for Finnish, Swedish and English
#[derive(Debug, Clone)]
pub struct FluentCountryCatalog {
    names: HashMap<LanguageIdentifier, BTreeMap<String, String>>,
    available: Vec<LanguageIdentifier>,
    fallback: LanguageIdentifier,
}

impl FluentCountryCatalog {
    /// Loads the bundled resources
    pub fn new() -> Result<Self, MembershipError> {
        let mut names = HashMap::new();
        let mut available = Vec::new();

        for (tag, source) in RESOURCES {
            let locale: LanguageIdentifier = tag
                .parse()
                .map_err(|e| MembershipError::Localization(format!("{tag}: {e}")))?;
            let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
                MembershipError::Localization(format!("{tag}: {} parse error(s)", errors.len()))
            })?;

            let mut bundle = FluentBundle::new(vec![locale.clone()]);
            bundle.set_use_isolating(false);
            bundle.add_resource(resource).map_err(|errors| {
                MembershipError::Localization(format!("{tag}: {} resource error(s)", errors.len()))
            })?;

            let mut formatted = BTreeMap::new();
            for code in COUNTRY_CODES {
                let id = format!("country-{code}");
                let Some(pattern) = bundle.get_message(&id).and_then(|message| message.value())
                else {
                    debug!(locale = %locale, code, "Country name missing from resource");
                    continue;
                };
                let mut errors = Vec::new();
                let name = bundle.format_pattern(pattern, None, &mut errors);
                if !errors.is_empty() {
                    return Err(MembershipError::Localization(format!(
                        "{tag}: cannot format {id}"
                    )));
                }
                formatted.insert(code.to_string(), name.into_owned());
            }

            available.push(locale.clone());
            names.insert(locale, formatted);
        }

        Ok(Self {
            names,
            available,
            fallback: langid!("en"),
        })
    }

    /// Locales to try for a requested language, best first
    fn negotiated(&self, requested: &LanguageIdentifier) -> Vec<&LanguageIdentifier> {
        negotiate_languages(
            std::slice::from_ref(requested),
            self.available.as_slice(),
            Some(&self.fallback),
            NegotiationStrategy::Filtering,
        )
    }
}

impl CountryCatalog for FluentCountryCatalog {
    fn country_name(&self, code: &str, language: Language) -> Option<String> {
        let code = code.trim().to_ascii_uppercase();
        if code.is_empty() {
            return None;
        }
        let requested = language.locale();
        self.negotiated(&requested)
            .into_iter()
            .filter_map(|locale| self.names.get(locale))
            .find_map(|names| names.get(&code).cloned())
    }

    fn is_known(&self, code: &str) -> bool {
        let code = code.trim().to_ascii_uppercase();
        COUNTRY_CODES.contains(&code.as_str())
    }

    fn country_codes(&self) -> Vec<String> {
        COUNTRY_CODES.iter().map(|c| c.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FluentCountryCatalog {
        FluentCountryCatalog::new().expect("bundled resources load")
    }

    #[test]
    fn test_localized_names() {
        let catalog = catalog();
        assert_eq!(catalog.country_name("FI", Language::Finnish).as_deref(), Some("Suomi"));
        assert_eq!(catalog.country_name("fi", Language::Swedish).as_deref(), Some("Finland"));
        assert_eq!(catalog.country_name("SE", Language::Finnish).as_deref(), Some("Ruotsi"));
        assert_eq!(catalog.country_name("AX", Language::English).as_deref(), Some("Åland Islands"));
    }

    #[test]
    fn test_unknown_codes() {
        let catalog = catalog();
        assert_eq!(catalog.country_name("ZZ", Language::Finnish), None);
        assert_eq!(catalog.country_name("", Language::Finnish), None);
        assert!(!catalog.is_known("ZZ"));
        assert!(catalog.is_known("de"));
    }

    #[test]
    fn test_every_locale_has_every_country() {
        let catalog = catalog();
        for language in Language::all() {
            for code in COUNTRY_CODES {
                assert!(
                    catalog.country_name(code, language).is_some(),
                    "{code} missing for {language:?}"
                );
            }
        }
    }

    #[test]
    fn test_regional_locale_negotiates_to_bundled_language() {
        let catalog = catalog();
        let locales = catalog.negotiated(&langid!("sv-FI"));
        assert_eq!(locales.first(), Some(&&langid!("sv")));
        assert_eq!(locales.last(), Some(&&langid!("en")));
    }

    #[test]
    fn test_full_iso_set_is_known() {
        let catalog = catalog();
        assert_eq!(COUNTRY_CODES.len(), 249);
        for code in ["MX", "ZA", "EG", "AR", "KE", "SY"] {
            assert!(catalog.is_known(code), "{code} should be known");
        }
        assert_eq!(catalog.country_name("MX", Language::Finnish).as_deref(), Some("Meksiko"));
        assert_eq!(catalog.country_name("ZA", Language::Swedish).as_deref(), Some("Sydafrika"));
        assert!(!catalog.is_known("XK"));
    }

    #[test]
    fn test_codes_sorted() {
        let codes = catalog().country_codes();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
        assert_eq!(codes.len(), COUNTRY_CODES.len());
    }
}
