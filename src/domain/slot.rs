//! Consultation slots and the blocked ranges layered on top of them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::types::{AstrologerId, BlockedSlotId, ReportPrefix, TimeOfDay};

/// First bookable minute of the consultation day.
pub const DAY_START: &str = "10:00AM";
/// End of the consultation day.
pub const DAY_END: &str = "7:00PM";
/// Length of a single consultation slot.
pub const SLOT_MINUTES: u16 = 20;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AstrologerRef {
    pub id: AstrologerId,
    pub name: String,
}

/// Slot the backend reports as bookable.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AvailableSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub capacity: u32,
    pub available_astrologers: Vec<AstrologerRef>,
}

/// Which bookings a blocked range applies to.
///
/// A missing dimension means "all" for that dimension.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockScope {
    Global,
    Report { prefix: ReportPrefix },
    Astrologer { astrologer_id: AstrologerId },
    ReportAndAstrologer {
        prefix: ReportPrefix,
        astrologer_id: AstrologerId,
    },
}

impl BlockScope {
    pub fn classify(prefix: Option<ReportPrefix>, astrologer_id: Option<AstrologerId>) -> Self {
        match (prefix, astrologer_id) {
            (None, None) => BlockScope::Global,
            (Some(prefix), None) => BlockScope::Report { prefix },
            (None, Some(astrologer_id)) => BlockScope::Astrologer { astrologer_id },
            (Some(prefix), Some(astrologer_id)) => BlockScope::ReportAndAstrologer {
                prefix,
                astrologer_id,
            },
        }
    }

    pub fn prefix(&self) -> Option<&ReportPrefix> {
        match self {
            BlockScope::Report { prefix } | BlockScope::ReportAndAstrologer { prefix, .. } => {
                Some(prefix)
            }
            _ => None,
        }
    }

    pub fn astrologer_id(&self) -> Option<&AstrologerId> {
        match self {
            BlockScope::Astrologer { astrologer_id }
            | BlockScope::ReportAndAstrologer { astrologer_id, .. } => Some(astrologer_id),
            _ => None,
        }
    }

    /// Human readable description; `astrologer_name` replaces the raw id when known.
    pub fn label(&self, astrologer_name: Option<&str>) -> String {
        let astrologer = |id: &AstrologerId| {
            astrologer_name
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string())
        };
        match self {
            BlockScope::Global => "All reports, all astrologers".to_string(),
            BlockScope::Report { prefix } => format!("Report {prefix}, all astrologers"),
            BlockScope::Astrologer { astrologer_id } => {
                format!("All reports, astrologer {}", astrologer(astrologer_id))
            }
            BlockScope::ReportAndAstrologer {
                prefix,
                astrologer_id,
            } => format!("Report {prefix}, astrologer {}", astrologer(astrologer_id)),
        }
    }
}

/// A blocked interval returned by the backend.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct BlockedSlot {
    pub id: BlockedSlotId,
    pub date: Option<NaiveDate>,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub scope: BlockScope,
    pub astrologer_name: Option<String>,
    pub reason: Option<String>,
}

/// Request to block a time range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBlockedRange {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub scope: BlockScope,
    pub reason: Option<String>,
}

/// Filter shared by the availability and blocked-slot lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotQuery {
    pub date: NaiveDate,
    pub prefix: Option<ReportPrefix>,
    pub astrologer_id: Option<AstrologerId>,
}

impl SlotQuery {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            prefix: None,
            astrologer_id: None,
        }
    }

    pub fn prefix(mut self, prefix: ReportPrefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn astrologer(mut self, astrologer_id: AstrologerId) -> Self {
        self.astrologer_id = Some(astrologer_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_all_scopes() {
        let prefix = ReportPrefix::new("#LJR-").unwrap();
        let astrologer = AstrologerId::new("a1").unwrap();

        assert_eq!(BlockScope::classify(None, None), BlockScope::Global);
        assert!(matches!(
            BlockScope::classify(Some(prefix.clone()), None),
            BlockScope::Report { .. }
        ));
        assert!(matches!(
            BlockScope::classify(None, Some(astrologer.clone())),
            BlockScope::Astrologer { .. }
        ));
        let both = BlockScope::classify(Some(prefix), Some(astrologer));
        assert_eq!(both.prefix().unwrap().as_str(), "#LJR-");
        assert_eq!(both.astrologer_id().unwrap().as_str(), "a1");
    }

    #[test]
    fn labels_prefer_astrologer_name() {
        let scope = BlockScope::Astrologer {
            astrologer_id: AstrologerId::new("a1").unwrap(),
        };
        assert_eq!(scope.label(Some("Pandit Sharma")), "All reports, astrologer Pandit Sharma");
        assert_eq!(scope.label(None), "All reports, astrologer a1");
        assert_eq!(BlockScope::Global.label(None), "All reports, all astrologers");
    }
}
