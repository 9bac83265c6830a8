//! DTOs used by the slot blocking calendar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::slots::SlotEntry;

/// Calendar filters taken from the query string.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
    pub prefix: Option<String>,
    pub astrologer_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SlotsPageData {
    pub date: NaiveDate,
    /// Selector values echoed back; `all` when unscoped.
    pub prefix: String,
    pub astrologer_id: String,
    pub entries: Vec<SlotEntry>,
    pub available: usize,
    pub blocked: usize,
    /// Set when either list could not be loaded; both lists are then empty.
    pub load_failed: bool,
}
