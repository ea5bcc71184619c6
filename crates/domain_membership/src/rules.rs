//! Age-dependent field rules
//!
//! Every field has exactly one [`FieldRule`] in [`RULES`]: how its
//! [`FieldStatus`] is decided and which constraint its value must meet. The
//! table is evaluated against the live draft on every call; the birth date is
//! never cached.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use core_kernel::ensure_not_future;

use crate::age_policy::{AgeFlags, AgePolicy};
use crate::address::DEFAULT_COUNTRY_CODE;
use crate::draft::Draft;
use crate::ports::CountryCatalog;
use crate::validation::{
    check_email, check_text, AddressRequirement, AddressValidator, ErrorKind, ValidationReport,
    NAME_MAX, NAME_MIN,
};

pub const PHONE_MIN: usize = 6;
pub const PHONE_MAX: usize = 255;
pub const SCHOOL_NAME_MAX: usize = 128;
pub const SCHOOL_CLASS_MAX: usize = 10;

/// Fields of the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Phone,
    PrimaryAddress,
    Addresses,
    BirthDate,
    SchoolName,
    SchoolClass,
    ApproverFirstName,
    ApproverLastName,
    ApproverPhone,
    ApproverEmail,
    ProfileLanguage,
    LanguageAtHome,
    PhotoUsageApproved,
    Terms,
}

impl Field {
    /// Path used in validation reports
    ///
    /// Address fields are reported below this path, e.g.
    /// `primaryAddress.postalCode` or `addresses.0.city`.
    pub fn path(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Phone => "phone",
            Field::PrimaryAddress => "primaryAddress",
            Field::Addresses => "addresses",
            Field::BirthDate => "birthDate",
            Field::SchoolName => "schoolName",
            Field::SchoolClass => "schoolClass",
            Field::ApproverFirstName => "approverFirstName",
            Field::ApproverLastName => "approverLastName",
            Field::ApproverPhone => "approverPhone",
            Field::ApproverEmail => "approverEmail",
            Field::ProfileLanguage => "profileLanguage",
            Field::LanguageAtHome => "languageAtHome",
            Field::PhotoUsageApproved => "photoUsageApproved",
            Field::Terms => "terms",
        }
    }
}

/// Whether a field is asked and whether it must be answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldStatus {
    Required,
    Optional,
    Hidden,
}

/// Creation of a new profile or editing of a stored one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormMode {
    Create,
    Edit,
}

/// How the status of a field is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Required while the applicant needs guardian approval
    ApproverConsent,
    /// Required when the photo question is asked, hidden otherwise
    PhotoConsent,
    /// Required on creation, hidden when editing
    CreateOnly,
    /// Required on creation, optional when editing
    CreateRequired,
}

/// What a field's value must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Text { min: usize, max: usize },
    Email,
    PrimaryAddress,
    SecondaryAddresses,
    Answered,
    Accepted,
    BirthDate,
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub presence: Presence,
    pub constraint: Constraint,
}

const fn rule(field: Field, presence: Presence, constraint: Constraint) -> FieldRule {
    FieldRule {
        field,
        presence,
        constraint,
    }
}

const NAME: Constraint = Constraint::Text {
    min: NAME_MIN,
    max: NAME_MAX,
};
const PHONE: Constraint = Constraint::Text {
    min: PHONE_MIN,
    max: PHONE_MAX,
};

pub static RULES: &[FieldRule] = &[
    rule(Field::FirstName, Presence::Required, NAME),
    rule(Field::LastName, Presence::Required, NAME),
    rule(Field::Phone, Presence::Required, PHONE),
    rule(Field::PrimaryAddress, Presence::Required, Constraint::PrimaryAddress),
    rule(Field::Addresses, Presence::Optional, Constraint::SecondaryAddresses),
    rule(Field::BirthDate, Presence::CreateRequired, Constraint::BirthDate),
    rule(
        Field::SchoolName,
        Presence::Optional,
        Constraint::Text {
            min: 0,
            max: SCHOOL_NAME_MAX,
        },
    ),
    rule(
        Field::SchoolClass,
        Presence::Optional,
        Constraint::Text {
            min: 0,
            max: SCHOOL_CLASS_MAX,
        },
    ),
    rule(Field::ApproverFirstName, Presence::ApproverConsent, NAME),
    rule(Field::ApproverLastName, Presence::ApproverConsent, NAME),
    rule(Field::ApproverPhone, Presence::ApproverConsent, PHONE),
    rule(Field::ApproverEmail, Presence::ApproverConsent, Constraint::Email),
    rule(Field::ProfileLanguage, Presence::Optional, Constraint::None),
    rule(Field::LanguageAtHome, Presence::Optional, Constraint::None),
    rule(Field::PhotoUsageApproved, Presence::PhotoConsent, Constraint::Answered),
    rule(Field::Terms, Presence::CreateOnly, Constraint::Accepted),
];

/// Field statuses for one evaluation of the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    statuses: BTreeMap<Field, FieldStatus>,
    flags: AgeFlags,
}

impl RuleTable {
    pub fn status(&self, field: Field) -> FieldStatus {
        self.statuses
            .get(&field)
            .copied()
            .unwrap_or(FieldStatus::Optional)
    }

    pub fn flags(&self) -> AgeFlags {
        self.flags
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldStatus)> + '_ {
        self.statuses.iter().map(|(field, status)| (*field, *status))
    }

    /// Statuses keyed by field path
    pub fn by_path(&self) -> BTreeMap<&'static str, FieldStatus> {
        self.iter().map(|(field, status)| (field.path(), status)).collect()
    }
}

/// Evaluates and validates a draft against [`RULES`]
#[derive(Clone)]
pub struct RuleSet {
    policy: AgePolicy,
    default_country: String,
    countries: Option<Arc<dyn CountryCatalog>>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(AgePolicy::default())
    }
}

impl RuleSet {
    pub fn new(policy: AgePolicy) -> Self {
        Self {
            policy,
            default_country: DEFAULT_COUNTRY_CODE.to_string(),
            countries: None,
        }
    }

    /// Restricts country codes to those known to `countries`
    pub fn with_countries(mut self, countries: Arc<dyn CountryCatalog>) -> Self {
        self.countries = Some(countries);
        self
    }

    pub fn with_default_country(mut self, country_code: impl Into<String>) -> Self {
        self.default_country = country_code.into();
        self
    }

    pub fn policy(&self) -> &AgePolicy {
        &self.policy
    }

    fn status_of(presence: Presence, flags: &AgeFlags, mode: FormMode) -> FieldStatus {
        match presence {
            Presence::Required => FieldStatus::Required,
            Presence::Optional => FieldStatus::Optional,
            Presence::ApproverConsent if flags.requires_approver_consent => FieldStatus::Required,
            Presence::ApproverConsent => FieldStatus::Optional,
            Presence::PhotoConsent if flags.asks_photo_consent => FieldStatus::Required,
            Presence::PhotoConsent => FieldStatus::Hidden,
            Presence::CreateOnly => match mode {
                FormMode::Create => FieldStatus::Required,
                FormMode::Edit => FieldStatus::Hidden,
            },
            Presence::CreateRequired => match mode {
                FormMode::Create => FieldStatus::Required,
                FormMode::Edit => FieldStatus::Optional,
            },
        }
    }

    /// Computes the status of every field from the current draft
    pub fn evaluate(&self, draft: &Draft, mode: FormMode, now: DateTime<Utc>) -> RuleTable {
        let flags = self.policy.flags_for(draft.birth_date, now);
        let statuses = RULES
            .iter()
            .map(|rule| (rule.field, Self::status_of(rule.presence, &flags, mode)))
            .collect();
        debug!(?mode, ?flags, "Evaluated field rules");
        RuleTable { statuses, flags }
    }

    /// Validates the draft, returning every failing field path
    pub fn validate(&self, draft: &Draft, mode: FormMode, now: DateTime<Utc>) -> ValidationReport {
        let table = self.evaluate(draft, mode, now);
        let mut report = ValidationReport::new();

        for rule in RULES {
            let status = table.status(rule.field);
            if status == FieldStatus::Hidden {
                continue;
            }
            let required = status == FieldStatus::Required;
            let path = rule.field.path();

            match rule.constraint {
                Constraint::Text { min, max } => {
                    if let Some(kind) = check_text(text_value(draft, rule.field), min, max, required) {
                        report.add(path, kind);
                    }
                }
                Constraint::Email => {
                    if let Some(kind) = check_email(text_value(draft, rule.field), required) {
                        report.add(path, kind);
                    }
                }
                Constraint::PrimaryAddress => {
                    report.extend(AddressValidator::validate_address(
                        draft.address_list.primary(),
                        path,
                        AddressRequirement::Required,
                        self.countries.as_deref(),
                    ));
                }
                Constraint::SecondaryAddresses => {
                    let filled = draft.address_list.filled_secondaries(&self.default_country);
                    for (index, address) in filled {
                        report.extend(AddressValidator::validate_address(
                            address,
                            &format!("{path}.{index}"),
                            AddressRequirement::Optional,
                            self.countries.as_deref(),
                        ));
                    }
                }
                Constraint::Answered => {
                    if required && !draft.photo_usage_approved.is_answered() {
                        report.add(path, ErrorKind::Required);
                    }
                }
                Constraint::Accepted => {
                    if required && !draft.terms_accepted {
                        report.add(path, ErrorKind::Required);
                    }
                }
                Constraint::BirthDate => {
                    if let Some(kind) = self.check_birth_date(draft, mode, required, &table, now) {
                        report.add(path, kind);
                    }
                }
                Constraint::None => {}
            }
        }

        debug!(?mode, errors = report.len(), "Validated draft");
        report
    }

    fn check_birth_date(
        &self,
        draft: &Draft,
        mode: FormMode,
        required: bool,
        table: &RuleTable,
        now: DateTime<Utc>,
    ) -> Option<ErrorKind> {
        let Some(birth_date) = draft.birth_date else {
            return required.then_some(ErrorKind::Required);
        };
        if let Err(err) = ensure_not_future(birth_date, self.policy.today(now)) {
            debug!(%err, "Rejecting birth date");
            return Some(ErrorKind::InvalidValue);
        }
        if mode == FormMode::Create && table.flags().requires_manual_registration {
            return Some(ErrorKind::InvalidValue);
        }
        None
    }
}

fn text_value(draft: &Draft, field: Field) -> &str {
    match field {
        Field::FirstName => &draft.first_name,
        Field::LastName => &draft.last_name,
        Field::Phone => &draft.phone,
        Field::SchoolName => &draft.school_name,
        Field::SchoolClass => &draft.school_class,
        Field::ApproverFirstName => &draft.approver_first_name,
        Field::ApproverLastName => &draft.approver_last_name,
        Field::ApproverPhone => &draft.approver_phone,
        Field::ApproverEmail => &draft.approver_email,
        _ => "",
    }
}
