//! Ports and Adapters Infrastructure
//!
//! Foundational types for the hexagonal (ports and adapters) layout of the
//! membership domain. The remote profile service, the error tracker and the
//! localisation source are all reached through port traits defined in the
//! domain crate; the types here are what every port shares.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │         ProfileEditor / ProfileReconciler     │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │   ProfileStorePort · ErrorReporter · Catalog  │
//! └──────────────────────────────────────────────┘
//!            ▲                         ▲
//!   ┌────────┴────────┐       ┌────────┴────────┐
//!   │  Remote adapter │       │   Mock adapter   │
//!   │ (profile API)   │       │   (tests)        │
//!   └─────────────────┘       └──────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Failure reported by a port adapter
///
/// Adapters translate whatever their transport raises into one of these so
/// the editor can pick a notice and a retry policy without knowing the
/// transport.
#[derive(Debug, Error)]
pub enum PortError {
    /// No stored record for the caller
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// The store refused the payload, optionally naming the offending field
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The write clashes with what the store already holds
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout { operation: String, duration_ms: u64 },

    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// True for failures where resending the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }
}

/// Marker trait for all domain ports
///
/// Ports must be shareable across tasks so an editor can hold them behind `Arc`.
pub trait DomainPort: Send + Sync + 'static {}

/// Per-call context handed to every port operation
#[derive(Debug, Clone, Default)]
pub struct OperationMetadata {
    /// Ties the store call to the submission that issued it
    pub correlation_id: Option<String>,
    pub context: HashMap<String, String>,
}

impl OperationMetadata {
    pub fn with_correlation_id(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(correlation_id.into()),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_profile_is_not_transient() {
        let error = PortError::not_found("Profile", "current");
        assert!(!error.is_transient());
        assert_eq!(error.to_string(), "Not found: Profile with id current");
    }

    #[test]
    fn test_transport_failures_are_transient() {
        let timeout = PortError::Timeout {
            operation: "update_profile".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_transient());
        assert!(PortError::connection("reset by peer").is_transient());

        let rejected = PortError::Validation {
            message: "Invalid postal code".to_string(),
            field: Some("postalCode".to_string()),
        };
        assert!(!rejected.is_transient());
        assert!(!PortError::Conflict { message: "exists".to_string() }.is_transient());
    }

    #[test]
    fn test_metadata_carries_correlation_and_context() {
        let metadata = OperationMetadata::with_correlation_id("SUB-1").with_context("mode", "Edit");
        assert_eq!(metadata.correlation_id.as_deref(), Some("SUB-1"));
        assert_eq!(metadata.context.get("mode").map(String::as_str), Some("Edit"));
    }
}
