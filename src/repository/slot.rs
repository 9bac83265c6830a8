//! Consultation slot availability and blocking.

use reqwest::Method;

use crate::domain::slot::{AvailableSlot, BlockedSlot, NewBlockedRange, SlotQuery};
use crate::domain::types::BlockedSlotId;
use crate::models::slot::{AvailableSlotRecord, BlockRangePayload, BlockedSlotRecord};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ApiRepository, SlotReader, SlotWriter, convert_all};

fn slot_params(query: &SlotQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("date", query.date.format("%Y-%m-%d").to_string())];
    if let Some(prefix) = &query.prefix {
        params.push(("prefix", prefix.to_string()));
    }
    if let Some(astrologer_id) = &query.astrologer_id {
        params.push(("astrologerId", astrologer_id.to_string()));
    }
    params
}

impl SlotReader for ApiRepository {
    fn list_available_slots(&self, query: &SlotQuery) -> RepositoryResult<Vec<AvailableSlot>> {
        let request = self
            .get("/api/life-journey-report/available-consultation-slots")
            .query(&slot_params(query));

        let records: Vec<AvailableSlotRecord> = self.fetch(request)?;
        convert_all(records)
    }

    fn list_blocked_slots(&self, query: &SlotQuery) -> RepositoryResult<Vec<BlockedSlot>> {
        let request = self
            .get("/api/life-journey-report/blocked-slots")
            .query(&slot_params(query));

        let records: Vec<BlockedSlotRecord> = self.fetch(request)?;
        convert_all(records)
    }
}

impl SlotWriter for ApiRepository {
    fn block_range(&self, range: &NewBlockedRange) -> RepositoryResult<()> {
        let request = self
            .request(
                Method::POST,
                "/api/life-journey-report/block-astrologer-time-range",
            )
            .json(&BlockRangePayload::from(range));
        self.execute(request)
    }

    fn unblock_slot(&self, id: &BlockedSlotId) -> RepositoryResult<()> {
        let request = self.request(
            Method::DELETE,
            &format!("/api/life-journey-report/blocked-slots/{id}"),
        );
        self.execute(request)
    }
}
