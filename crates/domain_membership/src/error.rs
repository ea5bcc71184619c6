//! Membership domain errors
//!
//! Field-level problems are not errors in this sense: they are collected in a
//! [`ValidationReport`] and only surface here when a submission is blocked by
//! them. Missing relation identifiers on a stored profile are not errors at
//! all; the reconciler leaves the relation out of the request.

use thiserror::Error;

use core_kernel::PortError;

use crate::validation::ValidationReport;

/// Errors that can occur in the membership domain
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Age thresholds are not ordered manual <= photo <= adult
    #[error(
        "Invalid age thresholds: manual registration {manual_registration_min}, \
         photo permission {photo_permission_min}, adult {adult}"
    )]
    InvalidThresholds {
        manual_registration_min: u32,
        photo_permission_min: u32,
        adult: u32,
    },

    /// The draft has field errors and cannot be submitted
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(ValidationReport),

    /// A submission for this draft is still outstanding
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// The stored profile could not be fetched when opening the editor
    #[error("Loading profile failed: {0}")]
    Load(#[source] PortError),

    /// The profile store rejected or failed the submission
    #[error("Submission failed: {0}")]
    Submission(#[source] PortError),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The configuration source could not be read
    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// A country-name resource failed to load
    #[error("Localization resource error: {0}")]
    Localization(String),
}

impl MembershipError {
    /// Creates a Configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        MembershipError::Configuration(message.into())
    }

    /// Returns true if the caller may retry the same draft unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, MembershipError::Submission(_))
    }
}
