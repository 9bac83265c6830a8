//! Slot list assembly for the blocking calendar.
//!
//! The backend returns bookable slots and blocked ranges separately. The
//! calendar shows them as one list ordered by start time, and bulk actions
//! address rows by their `start-end` key.

use chrono::NaiveDate;
use serde::Serialize;

use crate::batch::BatchStep;
use crate::domain::slot::{
    AstrologerRef, AvailableSlot, BlockScope, BlockedSlot, DAY_END, DAY_START, NewBlockedRange,
};
use crate::domain::types::{BlockedSlotId, TimeOfDay, TypeConstraintError};

/// Builds the key identifying a time range in bulk selections.
pub fn range_key(start: TimeOfDay, end: TimeOfDay) -> String {
    format!("{start}-{end}")
}

/// One row of the merged calendar.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SlotEntry {
    pub key: String,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub is_available: bool,
    pub is_blocked: bool,
    pub capacity: u32,
    pub astrologers: Vec<AstrologerRef>,
    pub blocked_id: Option<BlockedSlotId>,
    pub scope: Option<BlockScope>,
    pub scope_label: Option<String>,
    pub reason: Option<String>,
}

impl From<AvailableSlot> for SlotEntry {
    fn from(slot: AvailableSlot) -> Self {
        Self {
            key: range_key(slot.start, slot.end),
            start: slot.start,
            end: slot.end,
            is_available: true,
            is_blocked: false,
            capacity: slot.capacity,
            astrologers: slot.available_astrologers,
            blocked_id: None,
            scope: None,
            scope_label: None,
            reason: None,
        }
    }
}

impl From<BlockedSlot> for SlotEntry {
    fn from(slot: BlockedSlot) -> Self {
        let scope_label = slot.scope.label(slot.astrologer_name.as_deref());
        Self {
            key: range_key(slot.start, slot.end),
            start: slot.start,
            end: slot.end,
            is_available: false,
            is_blocked: true,
            capacity: 0,
            astrologers: Vec::new(),
            blocked_id: Some(slot.id),
            scope: Some(slot.scope),
            scope_label: Some(scope_label),
            reason: slot.reason,
        }
    }
}

/// Concatenates available and blocked slots and orders them by start time.
///
/// The sort is stable: rows starting at the same minute keep their relative
/// order (available rows first, then blocked rows as returned).
pub fn merge_slots(available: Vec<AvailableSlot>, blocked: Vec<BlockedSlot>) -> Vec<SlotEntry> {
    let mut entries: Vec<SlotEntry> = available
        .into_iter()
        .map(SlotEntry::from)
        .chain(blocked.into_iter().map(SlotEntry::from))
        .collect();
    entries.sort_by_key(|entry| entry.start);
    entries
}

/// Action requested from the bulk toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Block,
    Unblock,
}

impl TryFrom<&str> for BulkAction {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "block" => Ok(BulkAction::Block),
            "unblock" => Ok(BulkAction::Unblock),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown bulk action `{other}`"
            ))),
        }
    }
}

/// Backend call derived from one selected row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotMutation {
    Block(NewBlockedRange),
    Unblock(BlockedSlotId),
}

/// Resolves every selected key against the current calendar.
///
/// Keys whose row does not fit the action (blocking a blocked row, unblocking
/// an available row, or a key that is no longer listed) become skips rather
/// than errors. New blocks inherit `date` and `scope` from the page filter.
pub fn plan_bulk(
    entries: &[SlotEntry],
    keys: &[String],
    action: BulkAction,
    date: NaiveDate,
    scope: &BlockScope,
    reason: Option<&str>,
) -> Vec<(String, BatchStep<SlotMutation>)> {
    keys.iter()
        .map(|key| {
            let matching = entries.iter().filter(|entry| &entry.key == key);
            let step = match action {
                BulkAction::Block => {
                    let mut rows = matching.clone();
                    if let Some(entry) = rows.find(|entry| entry.is_available) {
                        BatchStep::Run(SlotMutation::Block(NewBlockedRange {
                            date,
                            start: entry.start,
                            end: entry.end,
                            scope: scope.clone(),
                            reason: reason.map(str::to_string),
                        }))
                    } else if matching.clone().any(|entry| entry.is_blocked) {
                        BatchStep::Skip("already blocked".to_string())
                    } else {
                        BatchStep::Skip("slot not found".to_string())
                    }
                }
                BulkAction::Unblock => {
                    let mut rows = matching.clone();
                    if let Some(id) = rows.find_map(|entry| entry.blocked_id.clone()) {
                        BatchStep::Run(SlotMutation::Unblock(id))
                    } else if matching.clone().any(|entry| entry.is_available) {
                        BatchStep::Skip("not blocked".to_string())
                    } else {
                        BatchStep::Skip("slot not found".to_string())
                    }
                }
            };
            (key.clone(), step)
        })
        .collect()
}

/// Interprets a scope selector where blank or `all` means "every value".
pub fn optional_scope<T, F>(raw: Option<&str>, parse: F) -> Result<Option<T>, TypeConstraintError>
where
    F: FnOnce(&str) -> Result<T, TypeConstraintError>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => parse(value).map(Some),
    }
}

/// Builds a single range covering the whole consultation day.
pub fn full_day_range(
    date: NaiveDate,
    scope: BlockScope,
    reason: Option<String>,
) -> Result<NewBlockedRange, TypeConstraintError> {
    Ok(NewBlockedRange {
        date,
        start: TimeOfDay::parse(DAY_START)?,
        end: TimeOfDay::parse(DAY_END)?,
        scope,
        reason,
    })
}

/// Validates an operator-entered range.
pub fn custom_range(
    date: NaiveDate,
    start: &str,
    end: &str,
    scope: BlockScope,
    reason: Option<String>,
) -> Result<NewBlockedRange, TypeConstraintError> {
    let start = TimeOfDay::parse(start)?;
    let end = TimeOfDay::parse(end)?;
    if end <= start {
        return Err(TypeConstraintError::InvalidValue(
            "end time must be after start time".to_string(),
        ));
    }
    Ok(NewBlockedRange {
        date,
        start,
        end,
        scope,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AstrologerId, ReportPrefix};

    fn time(raw: &str) -> TimeOfDay {
        TimeOfDay::parse(raw).unwrap()
    }

    fn available(start: &str, end: &str) -> AvailableSlot {
        AvailableSlot {
            start: time(start),
            end: time(end),
            capacity: 2,
            available_astrologers: Vec::new(),
        }
    }

    fn blocked(id: &str, start: &str, end: &str, scope: BlockScope) -> BlockedSlot {
        BlockedSlot {
            id: BlockedSlotId::new(id).unwrap(),
            date: None,
            start: time(start),
            end: time(end),
            scope,
            astrologer_name: None,
            reason: None,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn merge_tags_and_sorts_by_parsed_start() {
        let entries = merge_slots(
            vec![available("1:00PM", "1:20PM"), available("10:00AM", "10:20AM")],
            vec![
                blocked("b1", "12:00PM", "12:20PM", BlockScope::Global),
                blocked("b2", "9:40AM", "10:00AM", BlockScope::Global),
            ],
        );

        let keys: Vec<_> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "9:40AM-10:00AM",
                "10:00AM-10:20AM",
                "12:00PM-12:20PM",
                "1:00PM-1:20PM"
            ]
        );
        assert!(entries[0].is_blocked && !entries[0].is_available);
        assert!(entries[1].is_available && !entries[1].is_blocked);
        assert_eq!(
            entries[0].scope_label.as_deref(),
            Some("All reports, all astrologers")
        );
    }

    #[test]
    fn merge_keeps_ties_in_input_order() {
        let entries = merge_slots(
            vec![available("11:00AM", "11:20AM")],
            vec![blocked(
                "b1",
                "11:00AM",
                "11:20AM",
                BlockScope::Report {
                    prefix: ReportPrefix::new("#LJR-").unwrap(),
                },
            )],
        );
        assert!(entries[0].is_available);
        assert!(entries[1].is_blocked);
        assert_eq!(
            entries[1].scope_label.as_deref(),
            Some("Report #LJR-, all astrologers")
        );
    }

    #[test]
    fn plan_bulk_skips_mismatched_actions() {
        let entries = merge_slots(
            vec![available("10:00AM", "10:20AM")],
            vec![blocked("b1", "10:20AM", "10:40AM", BlockScope::Global)],
        );
        let keys = vec![
            "10:00AM-10:20AM".to_string(),
            "10:20AM-10:40AM".to_string(),
            "5:00PM-5:20PM".to_string(),
        ];

        let plan = plan_bulk(&entries, &keys, BulkAction::Block, date(), &BlockScope::Global, None);

        assert!(matches!(plan[0].1, BatchStep::Run(SlotMutation::Block(_))));
        assert_eq!(plan[1].1, BatchStep::Skip("already blocked".to_string()));
        assert_eq!(plan[2].1, BatchStep::Skip("slot not found".to_string()));

        let plan = plan_bulk(
            &entries,
            &keys,
            BulkAction::Unblock,
            date(),
            &BlockScope::Global,
            None,
        );
        assert_eq!(plan[0].1, BatchStep::Skip("not blocked".to_string()));
        assert_eq!(
            plan[1].1,
            BatchStep::Run(SlotMutation::Unblock(BlockedSlotId::new("b1").unwrap()))
        );
    }

    #[test]
    fn full_day_with_all_selectors_is_global() {
        let prefix = optional_scope(Some("all"), |v| ReportPrefix::new(v)).unwrap();
        let astrologer = optional_scope(Some("all"), |v| AstrologerId::new(v)).unwrap();

        let range = full_day_range(date(), BlockScope::classify(prefix, astrologer), None).unwrap();

        assert_eq!(range.scope, BlockScope::Global);
        assert_eq!(range.start.to_string(), "10:00AM");
        assert_eq!(range.end.to_string(), "7:00PM");
    }

    #[test]
    fn custom_range_requires_forward_interval() {
        assert!(custom_range(date(), "11:00AM", "10:00AM", BlockScope::Global, None).is_err());
        assert!(custom_range(date(), "11:00AM", "11:00AM", BlockScope::Global, None).is_err());
        let range = custom_range(date(), "11:00AM", "1:00PM", BlockScope::Global, None).unwrap();
        assert_eq!(range.end.minutes() - range.start.minutes(), 120);
    }

    #[test]
    fn optional_scope_parses_specific_values() {
        let prefix = optional_scope(Some(" #ljr- "), |v| ReportPrefix::new(v)).unwrap();
        assert_eq!(prefix.unwrap().as_str(), "#LJR-");
        assert_eq!(optional_scope(None, |v| AstrologerId::new(v)).unwrap(), None);
    }
}
