//! Field-level form validation primitives.
//!
//! Catalog forms arrive as raw string-keyed bodies. The helpers here trim,
//! length-check, and coerce individual fields, pushing one [`FieldError`]
//! per failure so a submission reports everything wrong with it at once,
//! in field declaration order.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field the failure is tied to.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trim a raw text field; treat a missing field as an empty string.
pub fn trimmed(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Required text: non-empty after trimming and within `max` characters.
///
/// Always returns the sanitized value so the form can be re-rendered with
/// what the caller typed, even when an error was recorded.
pub fn required_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: Option<&str>,
    max: usize,
) -> String {
    let value = trimmed(value);
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{label} required")));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at most {max} characters"),
        ));
    }
    value
}

/// Optional text: within `max` characters; empty collapses to `None`.
pub fn optional_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let value = trimmed(value);
    if value.is_empty() {
        return None;
    }
    if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at most {max} characters"),
        ));
    }
    Some(value)
}

/// Required reference id: a positive integer naming an existing row.
///
/// Existence of the referent is checked separately, against the store.
pub fn required_ref(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: Option<&str>,
) -> Option<DbId> {
    let value = trimmed(value);
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{label} required")));
        return None;
    }
    match value.parse::<DbId>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.push(FieldError::new(field, format!("{label} is not a valid id")));
            None
        }
    }
}

/// Required number, parsed as f64.
pub fn required_number(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: Option<&str>,
) -> Option<f64> {
    let value = trimmed(value);
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{label} required")));
        return None;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            errors.push(FieldError::new(field, format!("{label} must be a number")));
            None
        }
    }
}

/// Required non-negative number (prices).
pub fn required_price(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: Option<&str>,
) -> Option<f64> {
    let n = required_number(errors, field, label, value)?;
    if n < 0.0 {
        errors.push(FieldError::new(
            field,
            format!("{label} must not be negative"),
        ));
        return None;
    }
    Some(n)
}

/// Required calendar date, accepted as `YYYY-MM-DD` (midnight UTC) or a
/// full RFC 3339 datetime.
pub fn required_date(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: Option<&str>,
) -> Option<Timestamp> {
    let value = trimmed(value);
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{label} required")));
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        let midnight: NaiveDateTime = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight));
    }
    match chrono::DateTime::parse_from_rfc3339(&value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("{label} must be a valid date"),
            ));
            None
        }
    }
}
