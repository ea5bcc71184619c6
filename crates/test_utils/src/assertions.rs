//! Custom Test Assertions
//!
//! Assertion helpers for validation reports and store requests that give
//! more meaningful failure messages than plain `assert_eq!`.

use domain_membership::{ErrorKind, UpdateRequest, ValidationReport};

/// Asserts that `path` failed with `kind`
pub fn assert_field_error(report: &ValidationReport, path: &str, kind: ErrorKind) {
    assert_eq!(
        report.get(path),
        Some(kind),
        "Expected {kind:?} on {path}, report was {}",
        serde_json::to_string(report).unwrap_or_default()
    );
}

/// Asserts that `path` has no error
pub fn assert_no_field_error(report: &ValidationReport, path: &str) {
    assert_eq!(
        report.get(path),
        None,
        "Expected no error on {path}, report was {}",
        serde_json::to_string(report).unwrap_or_default()
    );
}

/// Asserts that the report has no errors at all
pub fn assert_valid(report: &ValidationReport) {
    assert!(
        report.is_valid(),
        "Expected a valid draft, report was {}",
        serde_json::to_string(report).unwrap_or_default()
    );
}

/// Asserts the id carried by an address slot; `None` expects a `null` slot
pub fn assert_address_slot(request: &UpdateRequest, index: usize, expected_id: Option<&str>) {
    let slots = &request.profile.update_addresses;
    assert!(index < slots.len(), "Slot {index} missing, {} slot(s) present", slots.len());
    let actual = slots[index]
        .as_ref()
        .map(|update| update.id.as_ref().map(|id| id.as_str()));
    match expected_id {
        Some(id) => assert_eq!(actual, Some(Some(id)), "Slot {index} should update {id}"),
        None => assert_eq!(actual, None, "Slot {index} should be null"),
    }
}
