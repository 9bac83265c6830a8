//! Report automation queue: pre-select undelivered orders and send them to
//! the generation pipeline in one batch.

use chrono::NaiveDate;

use crate::domain::report::ReportOrder;
use crate::dto::TableFilters;
use crate::dto::reports::{AutomationPageData, AutomationQuery};
use crate::forms::reports::ProcessReportsForm;
use crate::models::report::ProcessSummary;
use crate::pagination::Paginated;
use crate::repository::{ReportReader, ReportWriter};
use crate::selection::select_first_n;
use crate::services::{ServiceError, ServiceResult};
use crate::status::{ReportStatus, StatusCounts, StatusFilter};

pub const DEFAULT_SELECT_COUNT: usize = 10;

/// Loads the queue, applies the toolbar filters and recomputes the automatic
/// selection over the requested page.
pub fn load_automation<R>(
    repo: &R,
    query: &AutomationQuery,
    today: NaiveDate,
    per_page: usize,
) -> ServiceResult<AutomationPageData>
where
    R: ReportReader + ?Sized,
{
    let table = query.table();
    let (preset, range) = table.date_range(today)?;
    let status = StatusFilter::<ReportStatus>::parse(table.status.as_deref())
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let search = table.search_term();

    let mut orders = repo.list_pending_reports().map_err(|err| {
        log::error!("Failed to load pending reports: {err}");
        err
    })?;
    orders.retain(|order| range.contains(order.created_at.date()));
    if let Some(term) = &search {
        orders.retain(|order| order.matches_search(term));
    }

    let counts = StatusCounts::tally(orders.iter().map(|order| order.status));
    let orders: Vec<ReportOrder> = orders
        .into_iter()
        .filter(|order| status.matches(order.status))
        .collect();
    let undelivered = orders.iter().filter(|order| !order.is_delivered()).count();

    let orders = Paginated::from_vec(orders, table.page(), per_page);
    let select_count = query.select.unwrap_or(DEFAULT_SELECT_COUNT);
    let selected = select_first_n(&orders.items, select_count);

    Ok(AutomationPageData {
        orders,
        selected,
        select_count,
        undelivered,
        counts,
        filters: TableFilters::new(preset, range, status.as_str(), search),
    })
}

/// Sends the ticked orders to report processing in a single request.
pub fn process_selected<R>(repo: &R, form: ProcessReportsForm) -> ServiceResult<ProcessSummary>
where
    R: ReportWriter + ?Sized,
{
    let ids = form.order_ids()?;

    let summary = repo.process_reports(&ids).map_err(|err| {
        log::error!("Failed to process {} report(s): {err}", ids.len());
        err
    })?;

    log::info!(
        "Report processing accepted {} order(s), {} failed",
        summary.processed,
        summary.failed
    );
    Ok(summary)
}
