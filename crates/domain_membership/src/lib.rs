//! Youth Membership Domain
//!
//! Age-gated validation and profile reconciliation for the youth membership
//! registration flow.
//!
//! # Components
//!
//! - **AgePolicy**: birth date and reference instant to age and policy flags
//! - **AddressValidator**: per-country postal code rules with a generic fallback
//! - **AddressList**: one primary address plus ordered secondary addresses
//! - **RuleSet**: required / optional / hidden status for every form field
//! - **ProfileReconciler**: draft plus stored profile to an update request
//!
//! The remote profile service, error tracking and country names are reached
//! through the traits in [`ports`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use domain_membership::{Draft, DraftDefaults, FormMode, ProfileReconciler, RuleSet};
//! use chrono::Utc;
//!
//! let draft = Draft::from_profile(&stored, &DraftDefaults::default());
//! let report = RuleSet::default().validate(&draft, FormMode::Edit, Utc::now());
//!
//! if report.is_valid() {
//!     let request = ProfileReconciler::default().build_update_request(Some(&stored), &draft);
//!     // hand `request` to the profile store
//! }
//! ```

pub mod age_policy;
pub mod address;
pub mod postal_code;
pub mod address_list;
pub mod profile;
pub mod draft;
pub mod validation;
pub mod rules;
pub mod request;
pub mod reconciler;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod editor;
pub mod error;

pub use age_policy::{
    compute_age, AgeFlags, AgePolicy, AgeThresholds, RegistrationPath, ADULT,
    MANUAL_REGISTRATION_MIN, PHOTO_PERMISSION_MIN,
};
pub use address::{format_primary_address, Address, AddressType, DEFAULT_COUNTRY_CODE};
pub use postal_code::{validate_postal_code, PostalCodeVerdict, GENERIC_POSTAL_CODE_MAX};
pub use address_list::{AddressList, AddressSnapshot};
pub use profile::{Email, Language, Phone, PhoneType, Profile, YouthLanguage, YouthProfile};
pub use draft::{Draft, DraftDefaults, PhotoConsent};
pub use validation::{AddressRequirement, AddressValidator, ErrorKind, FieldError, ValidationReport};
pub use rules::{Field, FieldStatus, FormMode, RuleSet, RuleTable};
pub use request::{
    AddressInput, AddressUpdate, CreateProfileInput, CreateRequest, PhoneInput, PhoneUpdate,
    UpdateProfileInput, UpdateRequest, YouthProfileInput,
};
pub use reconciler::ProfileReconciler;
pub use ports::{CountryCatalog, ErrorReporter, ProfileStorePort, TracingErrorReporter};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockFailure, MockGate, MockProfileStore, RecordingErrorReporter};
pub use adapters::FluentCountryCatalog;
pub use config::EngineConfig;
pub use editor::{EditorPorts, ProfileEditor, SubmissionNotice, SubmitOutcome};
pub use error::MembershipError;
