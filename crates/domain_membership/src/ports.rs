//! Membership Domain Ports
//!
//! The engine reaches its collaborators through these traits:
//!
//! - [`ProfileStorePort`]: the remote profile service holding the record
//! - [`ErrorReporter`]: external error tracking for failed submissions
//! - [`CountryCatalog`]: localized country names and the set of valid codes
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_membership::ports::ProfileStorePort;
//! use std::sync::Arc;
//!
//! pub struct RegistrationService {
//!     store: Arc<dyn ProfileStorePort>,
//! }
//!
//! impl RegistrationService {
//!     pub async fn current(&self) -> Result<Option<Profile>, PortError> {
//!         self.store.load_profile(OperationMetadata::default()).await
//!     }
//! }
//! ```

use async_trait::async_trait;
use tracing::error;

use core_kernel::{DomainPort, OperationMetadata, PortError};

use crate::profile::{Language, Profile};
use crate::request::{CreateRequest, UpdateRequest};

/// Port for the remote profile store
///
/// The store identifies the profile from the caller's session, so no profile
/// id is passed.
#[async_trait]
pub trait ProfileStorePort: DomainPort {
    /// Loads the caller's profile; `None` when none exists yet
    async fn load_profile(&self, metadata: OperationMetadata) -> Result<Option<Profile>, PortError>;

    /// Applies an update and returns the stored result
    async fn update_profile(
        &self,
        request: UpdateRequest,
        metadata: OperationMetadata,
    ) -> Result<Profile, PortError>;

    /// Creates the caller's profile
    async fn create_profile(
        &self,
        request: CreateRequest,
        metadata: OperationMetadata,
    ) -> Result<Profile, PortError>;
}

/// Receives submission failures for external tracking
pub trait ErrorReporter: Send + Sync {
    fn capture(&self, error: &PortError, metadata: &OperationMetadata);
}

/// Reporter that emits failures as tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn capture(&self, err: &PortError, metadata: &OperationMetadata) {
        error!(
            error = %err,
            transient = err.is_transient(),
            correlation_id = metadata.correlation_id.as_deref().unwrap_or(""),
            "Profile submission failed"
        );
    }
}

/// Country names by ISO 3166 alpha-2 code
pub trait CountryCatalog: Send + Sync {
    /// Localized name of the country, `None` for unknown codes
    fn country_name(&self, code: &str, language: Language) -> Option<String>;

    fn is_known(&self, code: &str) -> bool {
        self.country_name(code, Language::default()).is_some()
    }

    /// Every known code, sorted
    fn country_codes(&self) -> Vec<String>;
}

/// Mock implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use tokio::sync::{Notify, RwLock, Semaphore};

    use core_kernel::{AddressId, PhoneId, ProfileId};

    use crate::address::Address;
    use crate::profile::{Phone, PhoneType};

    /// Failure the mock store returns until cleared
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MockFailure {
        Connection(String),
        Timeout,
        Rejected { message: String, field: Option<String> },
        Unavailable,
    }

    impl MockFailure {
        fn to_port_error(&self, operation: &str) -> PortError {
            match self {
                MockFailure::Connection(message) => PortError::connection(message.clone()),
                MockFailure::Timeout => PortError::Timeout {
                    operation: operation.to_string(),
                    duration_ms: 30_000,
                },
                MockFailure::Rejected { message, field } => PortError::Validation {
                    message: message.clone(),
                    field: field.clone(),
                },
                MockFailure::Unavailable => PortError::ServiceUnavailable {
                    service: "profile-store".to_string(),
                },
            }
        }
    }

    /// Holds store writes open until released
    #[derive(Debug, Clone)]
    pub struct MockGate {
        permits: Arc<Semaphore>,
        entered: Arc<Notify>,
    }

    impl MockGate {
        fn new() -> Self {
            Self {
                permits: Arc::new(Semaphore::new(0)),
                entered: Arc::new(Notify::new()),
            }
        }

        /// Lets one held write continue
        pub fn release(&self) {
            self.permits.add_permits(1);
        }

        /// Waits until a write has reached the gate
        pub async fn wait_entered(&self) {
            self.entered.notified().await;
        }

        async fn pass(&self) {
            self.entered.notify_one();
            if let Ok(permit) = self.permits.acquire().await {
                permit.forget();
            }
        }
    }

    /// In-memory mock implementation of ProfileStorePort
    #[derive(Debug, Default)]
    pub struct MockProfileStore {
        profile: RwLock<Option<Profile>>,
        failure: RwLock<Option<MockFailure>>,
        gate: Option<MockGate>,
        last_update: RwLock<Option<UpdateRequest>>,
        last_create: RwLock<Option<CreateRequest>>,
        load_calls: AtomicUsize,
        update_calls: AtomicUsize,
        create_calls: AtomicUsize,
        next_id: AtomicUsize,
    }

    impl MockProfileStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the caller's profile
        pub fn with_profile(profile: Profile) -> Self {
            Self {
                profile: RwLock::new(Some(profile)),
                ..Self::default()
            }
        }

        /// Store whose writes wait on the returned gate
        pub fn held(profile: Option<Profile>) -> (Self, MockGate) {
            let gate = MockGate::new();
            let store = Self {
                profile: RwLock::new(profile),
                gate: Some(gate.clone()),
                ..Self::default()
            };
            (store, gate)
        }

        pub async fn fail_with(&self, failure: MockFailure) {
            *self.failure.write().await = Some(failure);
        }

        pub async fn clear_failure(&self) {
            *self.failure.write().await = None;
        }

        pub async fn stored_profile(&self) -> Option<Profile> {
            self.profile.read().await.clone()
        }

        pub async fn last_update(&self) -> Option<UpdateRequest> {
            self.last_update.read().await.clone()
        }

        pub async fn last_create(&self) -> Option<CreateRequest> {
            self.last_create.read().await.clone()
        }

        pub fn load_calls(&self) -> usize {
            self.load_calls.load(Ordering::SeqCst)
        }

        pub fn update_calls(&self) -> usize {
            self.update_calls.load(Ordering::SeqCst)
        }

        pub fn create_calls(&self) -> usize {
            self.create_calls.load(Ordering::SeqCst)
        }

        fn issue_id(&self, prefix: &str) -> String {
            format!("{prefix}{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        }

        async fn check_failure(&self, operation: &str) -> Result<(), PortError> {
            match self.failure.read().await.as_ref() {
                Some(failure) => Err(failure.to_port_error(operation)),
                None => Ok(()),
            }
        }

        async fn pass_gate(&self) {
            if let Some(gate) = &self.gate {
                gate.pass().await;
            }
        }

        fn apply_update(&self, profile: &mut Profile, request: &UpdateRequest) {
            let input = &request.profile;
            profile.first_name = input.first_name.clone();
            profile.last_name = input.last_name.clone();
            profile.language = Some(input.language);

            for update in input.update_addresses.iter().flatten() {
                let id = update
                    .id
                    .clone()
                    .unwrap_or_else(|| AddressId::new(self.issue_id("A")));
                let mut address = Address::new(
                    update.address.clone(),
                    update.postal_code.clone(),
                    update.city.clone(),
                    update.country_code.clone(),
                )
                .with_id(id.clone());
                address.is_primary = update.primary;
                address.address_type = update.address_type;

                if update.primary {
                    profile.primary_address = Some(address.clone());
                }
                match profile.addresses.iter_mut().find(|a| a.id.as_ref() == Some(&id)) {
                    Some(existing) => *existing = address,
                    None => profile.addresses.push(address),
                }
            }

            for update in input.update_phones.iter().flatten() {
                profile.primary_phone = Some(Phone {
                    id: update.id.clone(),
                    phone: update.phone.clone(),
                    phone_type: update.phone_type,
                });
            }

            let youth = &request.youth_profile;
            let text = |value: &str| (!value.is_empty()).then(|| value.to_string());
            let stored = &mut profile.youth_profile;
            stored.birth_date = youth.birth_date;
            stored.school_name = text(&youth.school_name);
            stored.school_class = text(&youth.school_class);
            stored.approver_first_name = text(&youth.approver_first_name);
            stored.approver_last_name = text(&youth.approver_last_name);
            stored.approver_phone = text(&youth.approver_phone);
            stored.approver_email = text(&youth.approver_email);
            stored.language_at_home = Some(youth.language_at_home);
            stored.photo_usage_approved = Some(youth.photo_usage_approved);
        }

        fn build_created(&self, request: &CreateRequest) -> Profile {
            let input = &request.profile;
            let addresses: Vec<Address> = input
                .add_addresses
                .iter()
                .map(|a| {
                    let mut address = Address::new(
                        a.address.clone(),
                        a.postal_code.clone(),
                        a.city.clone(),
                        a.country_code.clone(),
                    )
                    .with_id(self.issue_id("A"));
                    address.is_primary = a.primary;
                    address.address_type = a.address_type;
                    address
                })
                .collect();
            let primary_phone = input.add_phones.iter().find(|p| p.primary).map(|p| Phone {
                id: Some(PhoneId::new(self.issue_id("T"))),
                phone: p.phone.clone(),
                phone_type: PhoneType::Other,
            });

            let mut profile = Profile {
                id: Some(ProfileId::new(self.issue_id("P"))),
                primary_address: addresses.iter().find(|a| a.is_primary).cloned(),
                addresses,
                primary_phone,
                ..Profile::default()
            };
            let update = UpdateRequest {
                profile: crate::request::UpdateProfileInput {
                    first_name: input.first_name.clone(),
                    last_name: input.last_name.clone(),
                    language: input.language,
                    update_addresses: Vec::new(),
                    update_phones: Vec::new(),
                },
                youth_profile: request.youth_profile.clone(),
            };
            self.apply_update(&mut profile, &update);
            profile
        }
    }

    impl DomainPort for MockProfileStore {}

    #[async_trait]
    impl ProfileStorePort for MockProfileStore {
        async fn load_profile(
            &self,
            _metadata: OperationMetadata,
        ) -> Result<Option<Profile>, PortError> {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            self.check_failure("load_profile").await?;
            Ok(self.profile.read().await.clone())
        }

        async fn update_profile(
            &self,
            request: UpdateRequest,
            _metadata: OperationMetadata,
        ) -> Result<Profile, PortError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_update.write().await = Some(request.clone());
            self.pass_gate().await;
            self.check_failure("update_profile").await?;

            let mut stored = self.profile.write().await;
            let profile = stored
                .as_mut()
                .ok_or_else(|| PortError::not_found("Profile", "current"))?;
            self.apply_update(profile, &request);
            Ok(profile.clone())
        }

        async fn create_profile(
            &self,
            request: CreateRequest,
            _metadata: OperationMetadata,
        ) -> Result<Profile, PortError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_create.write().await = Some(request.clone());
            self.pass_gate().await;
            self.check_failure("create_profile").await?;

            let mut stored = self.profile.write().await;
            if stored.is_some() {
                return Err(PortError::Conflict {
                    message: "Profile already exists".to_string(),
                });
            }
            let profile = self.build_created(&request);
            *stored = Some(profile.clone());
            Ok(profile)
        }
    }

    /// A failure seen by [`RecordingErrorReporter`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CapturedError {
        pub message: String,
        pub correlation_id: Option<String>,
    }

    /// Error reporter that keeps everything it receives
    #[derive(Debug, Default)]
    pub struct RecordingErrorReporter {
        captured: Mutex<Vec<CapturedError>>,
    }

    impl RecordingErrorReporter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn captured(&self) -> Vec<CapturedError> {
            self.captured
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone()
        }

        pub fn count(&self) -> usize {
            self.captured().len()
        }
    }

    impl ErrorReporter for RecordingErrorReporter {
        fn capture(&self, error: &PortError, metadata: &OperationMetadata) {
            self.captured
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(CapturedError {
                    message: error.to_string(),
                    correlation_id: metadata.correlation_id.clone(),
                });
        }
    }

}
