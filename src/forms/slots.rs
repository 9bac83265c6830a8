use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::slot::{BlockScope, NewBlockedRange};
use crate::domain::types::{AstrologerId, ReportPrefix};
use crate::forms::{FormError, optional_text, parse_form_date};
use crate::slots::{BulkAction, custom_range, full_day_range, optional_scope};

/// Resolves the report/astrologer selectors; `all` or blank widen the scope.
pub fn parse_scope(prefix: Option<&str>, astrologer_id: Option<&str>) -> Result<BlockScope, FormError> {
    let prefix = optional_scope(prefix, |v| ReportPrefix::new(v))?;
    let astrologer_id = optional_scope(astrologer_id, |v| AstrologerId::new(v))?;
    Ok(BlockScope::classify(prefix, astrologer_id))
}

#[derive(Deserialize)]
/// Block an explicit time range.
pub struct BlockRangeForm {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub prefix: Option<String>,
    pub astrologer_id: Option<String>,
    pub reason: Option<String>,
}

impl TryFrom<BlockRangeForm> for NewBlockedRange {
    type Error = FormError;

    fn try_from(form: BlockRangeForm) -> Result<Self, Self::Error> {
        let scope = parse_scope(form.prefix.as_deref(), form.astrologer_id.as_deref())?;
        Ok(custom_range(
            parse_form_date(&form.date)?,
            &form.start_time,
            &form.end_time,
            scope,
            optional_text(form.reason.as_deref()),
        )?)
    }
}

#[derive(Deserialize)]
/// Block the whole consultation day.
pub struct BlockDayForm {
    pub date: String,
    pub prefix: Option<String>,
    pub astrologer_id: Option<String>,
    pub reason: Option<String>,
}

impl TryFrom<BlockDayForm> for NewBlockedRange {
    type Error = FormError;

    fn try_from(form: BlockDayForm) -> Result<Self, Self::Error> {
        let scope = parse_scope(form.prefix.as_deref(), form.astrologer_id.as_deref())?;
        Ok(full_day_range(
            parse_form_date(&form.date)?,
            scope,
            optional_text(form.reason.as_deref()),
        )?)
    }
}

#[derive(Deserialize)]
/// Bulk toolbar submission; `key` repeats once per ticked row.
pub struct BulkSlotsForm {
    pub date: String,
    pub prefix: Option<String>,
    pub astrologer_id: Option<String>,
    pub action: String,
    #[serde(default)]
    pub key: Vec<String>,
    pub reason: Option<String>,
}

/// Parsed bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRequest {
    pub date: NaiveDate,
    pub scope: BlockScope,
    pub action: BulkAction,
    pub keys: Vec<String>,
    pub reason: Option<String>,
}

impl TryFrom<BulkSlotsForm> for BulkRequest {
    type Error = FormError;

    fn try_from(form: BulkSlotsForm) -> Result<Self, Self::Error> {
        let mut keys = form.key;
        let mut seen = HashSet::new();
        keys.retain(|key| !key.trim().is_empty() && seen.insert(key.clone()));
        if keys.is_empty() {
            return Err(FormError::Invalid("Select at least one slot".to_string()));
        }
        Ok(BulkRequest {
            date: parse_form_date(&form.date)?,
            scope: parse_scope(form.prefix.as_deref(), form.astrologer_id.as_deref())?,
            action: BulkAction::try_from(form.action.as_str())?,
            keys,
            reason: optional_text(form.reason.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_day_with_all_selectors_is_global() {
        let form = BlockDayForm {
            date: "2026-03-14".to_string(),
            prefix: Some("all".to_string()),
            astrologer_id: Some("all".to_string()),
            reason: Some("  ".to_string()),
        };

        let range = NewBlockedRange::try_from(form).unwrap();

        assert_eq!(range.scope, BlockScope::Global);
        assert_eq!(range.start.to_string(), "10:00AM");
        assert_eq!(range.end.to_string(), "7:00PM");
        assert_eq!(range.reason, None);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let form = BlockRangeForm {
            date: "2026-03-14".to_string(),
            start_time: "2:00PM".to_string(),
            end_time: "1:00PM".to_string(),
            prefix: None,
            astrologer_id: Some("a1".to_string()),
            reason: None,
        };
        assert!(NewBlockedRange::try_from(form).is_err());
    }

    #[test]
    fn bulk_form_collects_repeated_keys() {
        let form: BulkSlotsForm = serde_html_form::from_str(
            "date=2026-03-14&prefix=all&action=block&key=10%3A00AM-10%3A20AM&key=10%3A20AM-10%3A40AM",
        )
        .unwrap();

        let request = BulkRequest::try_from(form).unwrap();

        assert_eq!(request.action, BulkAction::Block);
        assert_eq!(request.keys, vec!["10:00AM-10:20AM", "10:20AM-10:40AM"]);
        assert_eq!(request.scope, BlockScope::Global);
    }

    #[test]
    fn repeated_keys_are_sent_once_in_order() {
        let form = BulkSlotsForm {
            date: "2026-03-14".to_string(),
            prefix: None,
            astrologer_id: None,
            action: "unblock".to_string(),
            key: vec![
                "10:20AM-10:40AM".to_string(),
                "10:00AM-10:20AM".to_string(),
                "10:20AM-10:40AM".to_string(),
                " ".to_string(),
                "10:00AM-10:20AM".to_string(),
            ],
            reason: None,
        };

        let request = BulkRequest::try_from(form).unwrap();

        assert_eq!(request.keys, vec!["10:20AM-10:40AM", "10:00AM-10:20AM"]);
    }

    #[test]
    fn bulk_form_without_keys_is_rejected() {
        let form: BulkSlotsForm =
            serde_html_form::from_str("date=2026-03-14&action=unblock").unwrap();
        assert!(BulkRequest::try_from(form).is_err());
    }
}
