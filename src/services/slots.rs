//! Slot blocking calendar.

use chrono::NaiveDate;

use crate::batch::{BatchOutcome, BatchReport, run_sequential};
use crate::domain::slot::{BlockScope, NewBlockedRange, SlotQuery};
use crate::domain::types::BlockedSlotId;
use crate::dto::slots::{SlotsPageData, SlotsQuery};
use crate::forms::slots::{BlockDayForm, BlockRangeForm, BulkRequest, BulkSlotsForm, parse_scope};
use crate::forms::{optional_text, parse_form_date};
use crate::repository::errors::RepositoryError;
use crate::repository::{SlotReader, SlotWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::slots::{SlotEntry, SlotMutation, merge_slots, plan_bulk};

fn scoped_query(date: NaiveDate, scope: &BlockScope) -> SlotQuery {
    let mut query = SlotQuery::new(date);
    if let Some(prefix) = scope.prefix() {
        query = query.prefix(prefix.clone());
    }
    if let Some(astrologer_id) = scope.astrologer_id() {
        query = query.astrologer(astrologer_id.clone());
    }
    query
}

fn fetch_entries<R>(repo: &R, query: &SlotQuery) -> Result<Vec<SlotEntry>, RepositoryError>
where
    R: SlotReader + ?Sized,
{
    let available = repo.list_available_slots(query)?;
    let blocked = repo.list_blocked_slots(query)?;
    Ok(merge_slots(available, blocked))
}

/// Loads the merged calendar for one day.
///
/// When either list fails the page is rendered empty with `load_failed` set;
/// a rejected session still propagates so the operator is sent to login.
pub fn load_slots<R>(repo: &R, query: &SlotsQuery, today: NaiveDate) -> ServiceResult<SlotsPageData>
where
    R: SlotReader + ?Sized,
{
    let date = match optional_text(query.date.as_deref()) {
        Some(raw) => parse_form_date(&raw)?,
        None => today,
    };
    let scope = parse_scope(query.prefix.as_deref(), query.astrologer_id.as_deref())?;
    let slot_query = scoped_query(date, &scope);

    let (entries, load_failed) = match fetch_entries(repo, &slot_query) {
        Ok(entries) => (entries, false),
        Err(RepositoryError::Unauthorized) => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to load slots for {date}: {err}");
            (Vec::new(), true)
        }
    };

    let available = entries.iter().filter(|entry| entry.is_available).count();
    let blocked = entries.iter().filter(|entry| entry.is_blocked).count();

    Ok(SlotsPageData {
        date,
        prefix: slot_query
            .prefix
            .map(|prefix| prefix.to_string())
            .unwrap_or_else(|| "all".to_string()),
        astrologer_id: slot_query
            .astrologer_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "all".to_string()),
        entries,
        available,
        blocked,
        load_failed,
    })
}

fn block<R>(repo: &R, range: NewBlockedRange) -> ServiceResult<NewBlockedRange>
where
    R: SlotWriter + ?Sized,
{
    repo.block_range(&range).map_err(|err| {
        log::error!(
            "Failed to block {}-{} on {}: {err}",
            range.start,
            range.end,
            range.date
        );
        err
    })?;
    log::info!(
        "Blocked {}-{} on {} ({})",
        range.start,
        range.end,
        range.date,
        range.scope.label(None)
    );
    Ok(range)
}

/// Blocks an operator-entered time range.
pub fn block_range<R>(repo: &R, form: BlockRangeForm) -> ServiceResult<NewBlockedRange>
where
    R: SlotWriter + ?Sized,
{
    block(repo, NewBlockedRange::try_from(form)?)
}

/// Blocks the whole consultation day as a single range.
pub fn block_day<R>(repo: &R, form: BlockDayForm) -> ServiceResult<NewBlockedRange>
where
    R: SlotWriter + ?Sized,
{
    block(repo, NewBlockedRange::try_from(form)?)
}

/// Removes one blocked range.
pub fn unblock<R>(repo: &R, id: &str) -> ServiceResult<()>
where
    R: SlotWriter + ?Sized,
{
    let id = BlockedSlotId::new(id)?;
    repo.unblock_slot(&id).map_err(|err| {
        log::error!("Failed to unblock slot {id}: {err}");
        err
    })?;
    log::info!("Unblocked slot {id}");
    Ok(())
}

/// Applies a block or unblock action to every selected row, one backend call
/// at a time. Failed items do not stop the sweep and nothing is rolled back.
pub fn bulk_update<R>(repo: &R, form: BulkSlotsForm) -> ServiceResult<BatchReport>
where
    R: SlotReader + SlotWriter + ?Sized,
{
    let request = BulkRequest::try_from(form)?;

    let query = scoped_query(request.date, &request.scope);

    let entries = fetch_entries(repo, &query).map_err(|err| {
        log::error!("Failed to load slots for bulk update: {err}");
        err
    })?;

    let steps = plan_bulk(
        &entries,
        &request.keys,
        request.action,
        request.date,
        &request.scope,
        request.reason.as_deref(),
    );

    let report = run_sequential(steps, |mutation| match mutation {
        SlotMutation::Block(range) => repo.block_range(&range),
        SlotMutation::Unblock(id) => repo.unblock_slot(&id),
    });

    for result in &report.results {
        if let BatchOutcome::Skipped(reason) = &result.outcome {
            log::warn!("Skipped slot {}: {reason}", result.key);
        }
    }
    for (key, reason) in report.failures() {
        log::error!("Failed to update slot {key}: {reason}");
    }
    log::info!(
        "Bulk {:?} on {}: {}",
        request.action,
        request.date,
        report.summary()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::slot::AvailableSlot;
    use crate::domain::types::TimeOfDay;
    use crate::repository::mock::MockRepository;
    use crate::repository::test::TestSlotRepository;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn bulk_form(action: &str, keys: &[&str]) -> BulkSlotsForm {
        BulkSlotsForm {
            date: "2026-03-14".to_string(),
            prefix: Some("all".to_string()),
            astrologer_id: Some("all".to_string()),
            action: action.to_string(),
            key: keys.iter().map(|k| k.to_string()).collect(),
            reason: None,
        }
    }

    #[test]
    fn calendar_is_merged_and_counted() {
        let mut repo = MockRepository::new();
        repo.expect_list_available_slots()
            .withf(|q| q.prefix.as_ref().map(|p| p.as_str()) == Some("#LJR-"))
            .returning(|_| {
                Ok(vec![AvailableSlot {
                    start: TimeOfDay::parse("10:20AM").unwrap(),
                    end: TimeOfDay::parse("10:40AM").unwrap(),
                    capacity: 2,
                    available_astrologers: vec![],
                }])
            });
        repo.expect_list_blocked_slots().returning(|_| Ok(vec![]));
        let query = SlotsQuery {
            date: None,
            prefix: Some("#LJR-".to_string()),
            astrologer_id: Some("all".to_string()),
        };

        let data = load_slots(&repo, &query, today()).unwrap();

        assert_eq!(data.date, today());
        assert_eq!(data.prefix, "#LJR-");
        assert_eq!(data.astrologer_id, "all");
        assert_eq!((data.available, data.blocked), (1, 0));
        assert!(!data.load_failed);
    }

    #[test]
    fn one_failed_list_empties_the_page() {
        let mut repo = MockRepository::new();
        repo.expect_list_available_slots().returning(|_| Ok(vec![]));
        repo.expect_list_blocked_slots().returning(|_| {
            Err(RepositoryError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        });

        let data = load_slots(&repo, &SlotsQuery::default(), today()).unwrap();

        assert!(data.load_failed);
        assert!(data.entries.is_empty());
    }

    #[test]
    fn rejected_session_is_not_swallowed() {
        let mut repo = MockRepository::new();
        repo.expect_list_available_slots()
            .returning(|_| Err(RepositoryError::Unauthorized));

        assert!(matches!(
            load_slots(&repo, &SlotsQuery::default(), today()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn full_day_block_is_global() {
        let mut repo = MockRepository::new();
        repo.expect_block_range()
            .withf(|range| range.scope == BlockScope::Global)
            .times(1)
            .returning(|_| Ok(()));
        let form = BlockDayForm {
            date: "2026-03-14".to_string(),
            prefix: Some("all".to_string()),
            astrologer_id: Some("all".to_string()),
            reason: Some("Holiday".to_string()),
        };

        let range = block_day(&repo, form).unwrap();

        assert_eq!(range.start.to_string(), "10:00AM");
        assert_eq!(range.end.to_string(), "7:00PM");
    }

    #[test]
    fn partial_bulk_failure_blocks_only_successes() {
        let repo = TestSlotRepository::with_available(&[
            ("10:00AM", "10:20AM"),
            ("10:20AM", "10:40AM"),
            ("10:40AM", "11:00AM"),
        ])
        .failing_on("10:20AM-10:40AM");

        let report = bulk_update(
            &repo,
            bulk_form("block", &["10:00AM-10:20AM", "10:20AM-10:40AM", "10:40AM-11:00AM"]),
        )
        .unwrap();

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(repo.blocked_count(), report.succeeded());
        assert_eq!(repo.available_count(), 1);
    }

    #[test]
    fn mismatched_rows_are_skipped() {
        let repo = TestSlotRepository::with_available(&[("10:00AM", "10:20AM")]);
        bulk_update(&repo, bulk_form("block", &["10:00AM-10:20AM"])).unwrap();

        let report = bulk_update(
            &repo,
            bulk_form("block", &["10:00AM-10:20AM", "5:00PM-5:20PM"]),
        )
        .unwrap();

        assert_eq!(report.skipped(), 2);
        assert_eq!(repo.blocked_count(), 1);

        let report = bulk_update(&repo, bulk_form("unblock", &["10:00AM-10:20AM"])).unwrap();
        assert_eq!(report.succeeded(), 1);
        assert_eq!(repo.blocked_count(), 0);
    }
}
