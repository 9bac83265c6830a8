use serde::{Deserialize, Serialize};

use crate::domain::slot::{AstrologerRef, AvailableSlot, BlockScope, BlockedSlot, NewBlockedRange};
use crate::domain::types::{AstrologerId, BlockedSlotId, ReportPrefix, TimeOfDay, TypeConstraintError};
use crate::models::{non_blank, parse_optional_date};

#[derive(Debug, Clone, Deserialize)]
pub struct AstrologerRefRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Wire model for [`crate::domain::slot::AvailableSlot`].
pub struct AvailableSlotRecord {
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub available_count: u32,
    #[serde(default)]
    pub available_astrologers: Vec<AstrologerRefRecord>,
}

impl TryFrom<AvailableSlotRecord> for AvailableSlot {
    type Error = TypeConstraintError;

    fn try_from(record: AvailableSlotRecord) -> Result<Self, Self::Error> {
        let available_astrologers = record
            .available_astrologers
            .into_iter()
            .map(|a| {
                Ok(AstrologerRef {
                    id: AstrologerId::new(a.id)?,
                    name: a.name,
                })
            })
            .collect::<Result<Vec<_>, TypeConstraintError>>()?;
        Ok(Self {
            start: TimeOfDay::parse(&record.start_time)?,
            end: TimeOfDay::parse(&record.end_time)?,
            capacity: record.available_count.max(available_astrologers.len() as u32),
            available_astrologers,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Wire model for [`crate::domain::slot::BlockedSlot`].
pub struct BlockedSlotRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub prefix: Option<String>,
    pub astrologer_id: Option<String>,
    pub astrologer_name: Option<String>,
    pub reason: Option<String>,
}

/// A missing, blank or `all` selector means the block applies to every value.
fn scope_value(raw: Option<String>) -> Option<String> {
    non_blank(raw).filter(|v| !v.eq_ignore_ascii_case("all"))
}

impl TryFrom<BlockedSlotRecord> for BlockedSlot {
    type Error = TypeConstraintError;

    fn try_from(record: BlockedSlotRecord) -> Result<Self, Self::Error> {
        let prefix = scope_value(record.prefix).map(ReportPrefix::new).transpose()?;
        let astrologer_id = scope_value(record.astrologer_id)
            .map(AstrologerId::new)
            .transpose()?;
        Ok(Self {
            id: BlockedSlotId::new(record.id)?,
            date: parse_optional_date(record.date.as_deref())?,
            start: TimeOfDay::parse(&record.start_time)?,
            end: TimeOfDay::parse(&record.end_time)?,
            scope: BlockScope::classify(prefix, astrologer_id),
            astrologer_name: non_blank(record.astrologer_name),
            reason: non_blank(record.reason),
        })
    }
}

/// Body of `POST /api/life-journey-report/block-astrologer-time-range`.
///
/// Unscoped dimensions are sent as explicit `null`s.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockRangePayload {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub prefix: Option<String>,
    pub astrologer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&NewBlockedRange> for BlockRangePayload {
    fn from(range: &NewBlockedRange) -> Self {
        Self {
            date: range.date.format("%Y-%m-%d").to_string(),
            start_time: range.start.to_string(),
            end_time: range.end.to_string(),
            prefix: range.scope.prefix().map(|p| p.to_string()),
            astrologer_id: range.scope.astrologer_id().map(|a| a.to_string()),
            reason: range.reason.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::slots::{full_day_range, optional_scope};

    #[test]
    fn full_day_global_block_sends_nulls() {
        let prefix = optional_scope(Some("all"), |v| ReportPrefix::new(v)).unwrap();
        let astrologer = optional_scope(Some("all"), |v| AstrologerId::new(v)).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let range = full_day_range(date, BlockScope::classify(prefix, astrologer), None).unwrap();

        let json = serde_json::to_value(BlockRangePayload::from(&range)).unwrap();

        assert_eq!(
            json,
            json!({
                "date": "2026-03-14",
                "startTime": "10:00AM",
                "endTime": "7:00PM",
                "prefix": null,
                "astrologerId": null
            })
        );
    }

    #[test]
    fn blocked_record_scope_is_classified() {
        let record: BlockedSlotRecord = serde_json::from_str(
            r##"{"_id": "b1", "startTime": "11:00AM", "endTime": "11:20AM", "prefix": "#ljr-", "astrologerId": "all"}"##,
        )
        .unwrap();

        let slot = BlockedSlot::try_from(record).unwrap();

        assert_eq!(
            slot.scope,
            BlockScope::Report {
                prefix: ReportPrefix::new("#LJR-").unwrap()
            }
        );
    }

    #[test]
    fn available_capacity_falls_back_to_astrologer_count() {
        let record: AvailableSlotRecord = serde_json::from_str(
            r##"{"startTime": "10:00AM", "endTime": "10:20AM",
                "availableAstrologers": [{"_id": "a1", "name": "A"}, {"_id": "a2", "name": "B"}]}"##,
        )
        .unwrap();
        let slot = AvailableSlot::try_from(record).unwrap();
        assert_eq!(slot.capacity, 2);
    }
}
