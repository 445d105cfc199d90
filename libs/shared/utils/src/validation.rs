//! Request field parsing shared by the cells. Every failure is a
//! `ValidationError` naming the offending field.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use regex::Regex;

use shared_models::error::AppError;
use shared_models::identifier::{is_valid_identifier, IdentifierKind};

fn contact_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("contact pattern is valid"))
}

pub fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::ValidationError(format!("{} is required", field))),
    }
}

/// Trims the value; blank strings count as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Present-but-blank is rejected; absent stays absent.
pub fn patch_text(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    value.map(|v| required_text(field, Some(v))).transpose()
}

pub fn contact_number(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if contact_pattern().is_match(value) {
        Ok(value.to_string())
    } else {
        Err(AppError::ValidationError(format!(
            "{} must be exactly 10 digits",
            field
        )))
    }
}

pub fn iso_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::ValidationError(format!("{} must be a date in YYYY-MM-DD format", field))
    })
}

/// Accepts `YYYY-MM-DD` and the day-first `D/M/YYYY` form login screens send.
pub fn login_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .map_err(|_| {
            AppError::ValidationError(format!(
                "{} must be a date in YYYY-MM-DD or D/M/YYYY format",
                field
            ))
        })
}

/// Parses an appointment time. Offsets are honoured; naive values are UTC.
/// Sub-second precision is dropped so the value round-trips through storage.
pub fn visit_datetime(field: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    let value = value.trim();

    let parsed = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|naive| naive.and_utc())
                .ok_or(())
        })
        .map_err(|_| {
            AppError::ValidationError(format!(
                "{} must be an RFC 3339 timestamp or YYYY-MM-DDTHH:MM[:SS]",
                field
            ))
        })?;

    Ok(parsed.trunc_subsecs(0))
}

pub fn positive_measure(field: &str, value: Option<f64>) -> Result<Option<f64>, AppError> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(AppError::ValidationError(format!(
            "{} must be a positive number",
            field
        ))),
        other => Ok(other),
    }
}

/// Path and query identifiers must be well formed before they reach the store.
pub fn identifier(kind: IdentifierKind, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if is_valid_identifier(kind, value) {
        Ok(value.to_string())
    } else {
        Err(AppError::ValidationError(format!(
            "Invalid {} id '{}': expected {} followed by {} digits",
            kind,
            value,
            kind.prefix(),
            kind.width()
        )))
    }
}
