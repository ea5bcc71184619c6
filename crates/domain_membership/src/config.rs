//! Engine configuration

use serde::Deserialize;

use core_kernel::Timezone;

use crate::address::DEFAULT_COUNTRY_CODE;
use crate::age_policy::{AgePolicy, AgeThresholds};
use crate::draft::DraftDefaults;
use crate::error::MembershipError;
use crate::profile::{Language, YouthLanguage};

/// Engine configuration
///
/// Environment variables use the `MEMBERSHIP_` prefix and `__` between
/// nested keys, e.g. `MEMBERSHIP_THRESHOLDS__ADULT=18`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Age thresholds of the registration flow
    pub thresholds: AgeThresholds,
    /// Country for addresses without one
    pub default_country_code: String,
    /// Timezone in which ages are computed
    pub timezone: Timezone,
    /// Language for new drafts
    pub default_language: Language,
    /// Log level
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: AgeThresholds::default(),
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            timezone: Timezone::default(),
            default_language: Language::Finnish,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, MembershipError> {
        let source = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("MEMBERSHIP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::from_config(source)
    }

    /// Deserializes and validates an already built configuration
    pub fn from_config(source: config::Config) -> Result<Self, MembershipError> {
        let config: Self = source.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MembershipError> {
        self.thresholds.validate()?;
        let code = &self.default_country_code;
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(MembershipError::configuration(format!(
                "default_country_code must be a two-letter upper-case code, got {code:?}"
            )));
        }
        Ok(())
    }

    pub fn age_policy(&self) -> Result<AgePolicy, MembershipError> {
        AgePolicy::new(self.thresholds, self.timezone)
    }

    pub fn draft_defaults(&self) -> DraftDefaults {
        DraftDefaults {
            country_code: self.default_country_code.clone(),
            language: self.default_language,
            language_at_home: match self.default_language {
                Language::Finnish => YouthLanguage::Finnish,
                Language::Swedish => YouthLanguage::Swedish,
                Language::English => YouthLanguage::English,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds.adult, 18);
        assert_eq!(config.draft_defaults().country_code, "FI");
    }

    #[test]
    fn test_overrides() {
        let source = config::Config::builder()
            .set_override("thresholds.adult", 20)
            .unwrap()
            .set_override("default_country_code", "SE")
            .unwrap()
            .set_override("default_language", "SWEDISH")
            .unwrap()
            .build()
            .unwrap();
        let config = EngineConfig::from_config(source).unwrap();
        assert_eq!(config.thresholds.adult, 20);
        assert_eq!(config.thresholds.manual_registration_min, 13);
        assert_eq!(config.draft_defaults().language_at_home, YouthLanguage::Swedish);
    }

    #[test]
    fn test_misordered_thresholds_rejected() {
        let source = config::Config::builder()
            .set_override("thresholds.photo_permission_min", 20)
            .unwrap()
            .build()
            .unwrap();
        assert!(matches!(
            EngineConfig::from_config(source),
            Err(MembershipError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn test_bad_country_rejected() {
        let config = EngineConfig {
            default_country_code: "Finland".to_string(),
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(MembershipError::Configuration(_))));
    }
}
