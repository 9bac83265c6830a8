//! Wire models exchanged with the platform REST backend.
//!
//! Every response is wrapped in an [`Envelope`]. Records are converted into
//! domain entities through `TryFrom`, which is where malformed payloads are
//! rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::domain::types::TypeConstraintError;

pub mod admin;
#[cfg(feature = "server")]
pub mod auth;
pub mod astrologer;
#[cfg(feature = "server")]
pub mod config;
pub mod consultation;
pub mod puja;
pub mod report;
pub mod route;
pub mod slot;

fn default_success() -> bool {
    true
}

/// Standard `{ success, data, message }` response wrapper.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub pagination: Option<PageMeta>,
}

/// Paging block attached to list responses.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

/// Parses backend timestamps. Accepts RFC 3339 (`2026-01-05T09:30:00.000Z`)
/// and naive `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` forms.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TypeConstraintError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| TypeConstraintError::InvalidValue(format!("invalid timestamp `{raw}`")))
}

/// Parses a calendar date, tolerating a trailing time component.
pub fn parse_date(raw: &str) -> Result<NaiveDate, TypeConstraintError> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|_| TypeConstraintError::InvalidValue(format!("invalid date `{raw}`")))
}

/// Parses an optional date field where blank means absent.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, TypeConstraintError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

/// Trims an optional string and drops it when blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
