//! Profile editor with single-flight submission
//!
//! The editor owns the loaded profile, the draft and the ports. Only one
//! submission can be outstanding at a time: a second call gets
//! [`MembershipError::SubmissionInFlight`] until the first resolves or its
//! future is dropped. Closing the editor while a submission is in flight
//! discards the result without reporting or raising a notice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use core_kernel::{Clock, OperationMetadata, PortError, SubmissionId, SystemClock};

use crate::config::EngineConfig;
use crate::draft::{Draft, DraftDefaults};
use crate::error::MembershipError;
use crate::ports::{CountryCatalog, ErrorReporter, ProfileStorePort, TracingErrorReporter};
use crate::profile::Profile;
use crate::reconciler::ProfileReconciler;
use crate::rules::{FormMode, RuleSet, RuleTable};
use crate::validation::ValidationReport;

/// Collaborators of an editor
#[derive(Clone)]
pub struct EditorPorts {
    pub store: Arc<dyn ProfileStorePort>,
    pub reporter: Arc<dyn ErrorReporter>,
    pub clock: Arc<dyn Clock>,
    pub countries: Option<Arc<dyn CountryCatalog>>,
}

impl EditorPorts {
    /// Ports for `store` with the wall clock, tracing-based error reporting
    /// and no country restriction
    pub fn new(store: Arc<dyn ProfileStorePort>) -> Self {
        Self {
            store,
            reporter: Arc::new(TracingErrorReporter),
            clock: Arc::new(SystemClock),
            countries: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_countries(mut self, countries: Arc<dyn CountryCatalog>) -> Self {
        self.countries = Some(countries);
        self
    }
}

/// Dismissible notice raised by a failed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionNotice {
    pub submission_id: String,
    pub message: String,
    pub retryable: bool,
}

/// Result of a submission that reached the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The store accepted the request
    Saved(Profile),
    /// The editor was closed before the store answered
    Discarded,
}

/// Resets the in-flight flag when dropped
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmissionGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Editing session for one profile
pub struct ProfileEditor {
    original: Option<Profile>,
    draft: Draft,
    mode: FormMode,
    rules: RuleSet,
    reconciler: ProfileReconciler,
    defaults: DraftDefaults,
    store: Arc<dyn ProfileStorePort>,
    reporter: Arc<dyn ErrorReporter>,
    clock: Arc<dyn Clock>,
    in_flight: AtomicBool,
    closed: AtomicBool,
    notice: Mutex<Option<SubmissionNotice>>,
}

impl ProfileEditor {
    /// Creates an editor for `original`, or a creation form when it is `None`
    pub fn new(
        original: Option<Profile>,
        config: &EngineConfig,
        ports: EditorPorts,
    ) -> Result<Self, MembershipError> {
        let mut rules =
            RuleSet::new(config.age_policy()?).with_default_country(&config.default_country_code);
        if let Some(countries) = ports.countries {
            rules = rules.with_countries(countries);
        }
        let defaults = config.draft_defaults();
        let (draft, mode) = match &original {
            Some(profile) => (Draft::from_profile(profile, &defaults), FormMode::Edit),
            None => (Draft::empty(&defaults), FormMode::Create),
        };

        Ok(Self {
            original,
            draft,
            mode,
            rules,
            reconciler: ProfileReconciler::new(&config.default_country_code),
            defaults,
            store: ports.store,
            reporter: ports.reporter,
            clock: ports.clock,
            in_flight: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            notice: Mutex::new(None),
        })
    }

    /// Loads the caller's profile through the store and opens an editor for it
    #[instrument(skip(config, ports))]
    pub async fn load(config: &EngineConfig, ports: EditorPorts) -> Result<Self, MembershipError> {
        let original = ports
            .store
            .load_profile(OperationMetadata::default())
            .await
            .map_err(MembershipError::Load)?;
        debug!(existing = original.is_some(), "Loaded profile");
        Self::new(original, config, ports)
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn original(&self) -> Option<&Profile> {
        self.original.as_ref()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Adds a blank secondary address and returns its index
    pub fn add_secondary_address(&mut self) -> usize {
        self.draft
            .address_list
            .add_secondary(None, &self.defaults.country_code)
    }

    pub fn remove_secondary_address(&mut self, index: usize) {
        self.draft.address_list.remove_secondary(index);
    }

    /// Field statuses for the current draft
    pub fn rule_table(&self) -> RuleTable {
        self.rules.evaluate(&self.draft, self.mode, self.clock.now())
    }

    pub fn validate(&self) -> ValidationReport {
        self.rules.validate(&self.draft, self.mode, self.clock.now())
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn notice(&self) -> Option<SubmissionNotice> {
        self.notice
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dismiss_notice(&self) {
        self.set_notice(None);
    }

    fn set_notice(&self, notice: Option<SubmissionNotice>) {
        *self.notice.lock().unwrap_or_else(PoisonError::into_inner) = notice;
    }

    /// Marks the editor as torn down; outstanding results will be discarded
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Replaces the snapshot and draft with a profile returned by the store
    pub fn accept_saved(&mut self, profile: Profile) {
        self.draft = Draft::from_profile(&profile, &self.defaults);
        self.original = Some(profile);
        self.mode = FormMode::Edit;
        self.set_notice(None);
    }

    /// Validates the draft and sends it to the store
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn submit(&self) -> Result<SubmitOutcome, MembershipError> {
        let Some(_guard) = SubmissionGuard::acquire(&self.in_flight) else {
            warn!("Refusing submission while another is outstanding");
            return Err(MembershipError::SubmissionInFlight);
        };
        if self.is_closed() {
            return Ok(SubmitOutcome::Discarded);
        }

        let report = self.validate();
        if !report.is_valid() {
            debug!(errors = report.len(), "Draft has field errors");
            return Err(MembershipError::Validation(report));
        }

        let submission_id = SubmissionId::new_v7();
        let metadata = OperationMetadata::with_correlation_id(submission_id.to_string())
            .with_context("mode", format!("{:?}", self.mode));
        info!(%submission_id, "Submitting profile");

        let result = match self.mode {
            FormMode::Edit => {
                let request = self
                    .reconciler
                    .build_update_request(self.original.as_ref(), &self.draft);
                self.store.update_profile(request, metadata.clone()).await
            }
            FormMode::Create => {
                let request = self.reconciler.build_create_request(&self.draft);
                self.store.create_profile(request, metadata.clone()).await
            }
        };

        if self.is_closed() {
            info!(%submission_id, "Editor closed during submission, discarding result");
            return Ok(SubmitOutcome::Discarded);
        }

        match result {
            Ok(profile) => {
                info!(%submission_id, "Profile saved");
                self.set_notice(None);
                Ok(SubmitOutcome::Saved(profile))
            }
            Err(err) => Err(self.fail(submission_id, err, &metadata)),
        }
    }

    fn fail(
        &self,
        submission_id: SubmissionId,
        err: PortError,
        metadata: &OperationMetadata,
    ) -> MembershipError {
        self.reporter.capture(&err, metadata);
        self.set_notice(Some(SubmissionNotice {
            submission_id: submission_id.to_string(),
            message: err.to_string(),
            retryable: true,
        }));
        MembershipError::Submission(err)
    }
}
