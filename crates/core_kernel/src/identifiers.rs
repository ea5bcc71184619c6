//! Strongly-typed identifiers for profile entities
//!
//! Profile, address, phone and email identifiers are issued by the remote
//! profile store and are opaque to this system: they are carried around and
//! echoed back, never generated or parsed. Newtype wrappers keep an address id
//! from being sent where a phone id is expected.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_opaque_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an identifier received from the profile store
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the entity name used in error messages
            pub fn entity() -> &'static str {
                $entity
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_opaque_id!(ProfileId, "Profile");
define_opaque_id!(AddressId, "Address");
define_opaque_id!(PhoneId, "Phone");
define_opaque_id!(EmailId, "Email");

/// Identifier of a single submission attempt
///
/// Only used to correlate log lines and error reports; it is never part of a
/// request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    /// Creates a new time-ordered identifier (v7)
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new_v7()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SUB-{}", self.0)
    }
}
