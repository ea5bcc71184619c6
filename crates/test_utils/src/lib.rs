//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! youth membership test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built profiles, addresses and reference instants
//! - `builders`: Builder patterns for profiles and addresses
//! - `assertions`: Assertion helpers for validation reports and requests
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
