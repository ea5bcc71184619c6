//! Core Kernel - Foundational types shared by the membership crates
//!
//! This crate provides the building blocks used by the domain and test crates:
//! - Opaque identifiers for entities owned by the remote profile store
//! - Port error and metadata types for the ports-and-adapters seams
//! - Clock and timezone handling for age-dependent rules

pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use temporal::{ensure_not_future, Clock, FixedClock, SystemClock, TemporalError, Timezone};
pub use identifiers::{AddressId, EmailId, PhoneId, ProfileId, SubmissionId};
pub use ports::{DomainPort, OperationMetadata, PortError};
