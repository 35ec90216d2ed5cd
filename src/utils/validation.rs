//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so bounds are applied
//! here before anything reaches a repository.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Category names must be meaningful enough to navigate by
pub const MIN_NAME_LEN: usize = 3;

/// Entity names: category, product, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions shorter than this are indistinguishable from placeholders
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Descriptions, notes, reasons
pub const MAX_DESCRIPTION_LEN: usize = 500;

// ── Validation helpers (CRUD paths) ─────────────────────────────────

/// Validate that a required string is non-empty and within the length bounds.
pub fn validate_required_text(
    value: &str,
    field: &str,
    min_len: usize,
    max_len: usize,
) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() < min_len {
        return Err(AppError::BadRequest(format!(
            "{field} is too short (min {min_len} chars)"
        )));
    }
    if value.len() > max_len {
        return Err(AppError::BadRequest(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, satisfies the same bounds.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    min_len: usize,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        validate_required_text(v, field, min_len, max_len)?;
    }
    Ok(())
}
