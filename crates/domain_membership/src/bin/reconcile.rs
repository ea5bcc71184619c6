//! Youth Membership - Reconcile CLI
//!
//! Validates a draft and prints the request it would produce.
//!
//! # Usage
//!
//! ```bash
//! # Creation flow: only a draft
//! membership-reconcile draft.json
//!
//! # Edit flow: draft plus the profile it was loaded from
//! membership-reconcile draft.json profile.json
//!
//! # With a different adult age
//! MEMBERSHIP_THRESHOLDS__ADULT=20 membership-reconcile draft.json profile.json
//! ```
//!
//! # Environment Variables
//!
//! * `MEMBERSHIP_THRESHOLDS__MANUAL_REGISTRATION_MIN` (default: 13)
//! * `MEMBERSHIP_THRESHOLDS__PHOTO_PERMISSION_MIN` (default: 15)
//! * `MEMBERSHIP_THRESHOLDS__ADULT` (default: 18)
//! * `MEMBERSHIP_DEFAULT_COUNTRY_CODE` (default: FI)
//! * `MEMBERSHIP_TIMEZONE` (default: Europe/Helsinki)
//! * `MEMBERSHIP_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{Clock, SystemClock};
use domain_membership::{
    Draft, EngineConfig, FluentCountryCatalog, FormMode, Profile, ProfileReconciler, RuleSet,
};

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the draft was valid
fn run() -> anyhow::Result<bool> {
    dotenvy::dotenv().ok();

    let config = EngineConfig::from_env().context("loading configuration")?;
    init_tracing(&config.log_level);

    let mut args = std::env::args().skip(1);
    let Some(draft_path) = args.next() else {
        bail!("usage: membership-reconcile <draft.json> [original-profile.json]");
    };
    let original: Option<Profile> = args.next().map(|path| read_json(Path::new(&path))).transpose()?;
    let draft: Draft = read_json(Path::new(&draft_path))?;

    let mode = if original.is_some() {
        FormMode::Edit
    } else {
        FormMode::Create
    };
    tracing::info!(?mode, draft = %draft_path, "Reconciling draft");

    let countries = Arc::new(FluentCountryCatalog::new()?);
    let rules = RuleSet::new(config.age_policy()?)
        .with_default_country(&config.default_country_code)
        .with_countries(countries);

    let report = rules.validate(&draft, mode, SystemClock.now());
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_valid() {
        tracing::warn!(errors = report.len(), "Draft is not valid, no request built");
        return Ok(false);
    }

    let reconciler = ProfileReconciler::new(&config.default_country_code);
    let request = match mode {
        FormMode::Edit => serde_json::to_string_pretty(
            &reconciler.build_update_request(original.as_ref(), &draft),
        )?,
        FormMode::Create => serde_json::to_string_pretty(&reconciler.build_create_request(&draft))?,
    };
    println!("{request}");
    Ok(true)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

/// Initializes the tracing subscriber; logs go to stderr so stdout stays JSON
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
