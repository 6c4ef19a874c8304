//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same rules.

use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Trim a required name, rejecting blank values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text; blank becomes `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Apply a text patch: `None` keeps `current`, a blank value clears it.
pub(crate) fn apply_optional_text_patch(
    current: Option<String>,
    patch: Option<&str>,
) -> Option<String> {
    match patch {
        None => current,
        Some(value) => normalize_optional_text(Some(value)),
    }
}

pub(crate) fn require_positive_amount(amount_minor: i64) -> ResultEngine<()> {
    if !Money::new(amount_minor).is_positive() {
        return Err(EngineError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Reject the nil UUID, which clients send for a missing reference.
pub(crate) fn require_id(id: Uuid, label: &str) -> ResultEngine<()> {
    if id.is_nil() {
        return Err(EngineError::Validation(format!("{label} is required")));
    }
    Ok(())
}
