//! Report orders table: filtering, inline updates and exports.

use chrono::NaiveDate;

use crate::domain::report::{ReportOrder, UpdateReportOrder};
use crate::domain::types::OrderId;
use crate::dto::reports::ReportOrdersPageData;
use crate::dto::{TableFilters, TableQuery};
use crate::export::{export_filename, to_csv};
use crate::forms::reports::UpdateReportOrderForm;
use crate::pagination::Paginated;
use crate::repository::{ReportOrderQuery, ReportReader, ReportWriter};
use crate::services::{CsvDownload, ServiceError, ServiceResult};
use crate::status::{ReportStatus, StatusCounts, StatusFilter};

/// Page size used while walking the backend listing.
const FETCH_PAGE_SIZE: usize = 100;

struct Selection {
    filters: TableFilters,
    status: StatusFilter<ReportStatus>,
    /// Range and search only; the status filter is applied by the caller.
    query: ReportOrderQuery,
}

fn select_orders(query: &TableQuery, today: NaiveDate) -> ServiceResult<Selection> {
    let (preset, range) = query.date_range(today)?;
    let status = StatusFilter::<ReportStatus>::parse(query.status.as_deref())
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let search = query.search_term();

    let mut order_query = ReportOrderQuery::new().range(range);
    if let Some(term) = &search {
        order_query = order_query.search(term.clone());
    }

    Ok(Selection {
        filters: TableFilters::new(preset, range, status.as_str(), search),
        status,
        query: order_query,
    })
}

/// Walks every backend page of the listing.
fn fetch_all_orders<R>(repo: &R, query: &ReportOrderQuery) -> ServiceResult<Vec<ReportOrder>>
where
    R: ReportReader + ?Sized,
{
    let mut orders = Vec::new();
    let mut page = 1;
    loop {
        let result = repo
            .list_report_orders(&query.clone().paginate(page, FETCH_PAGE_SIZE))
            .map_err(|err| {
                log::error!("Failed to load report orders page {page}: {err}");
                err
            })?;
        let fetched = result.items.len();
        orders.extend(result.items);
        if fetched == 0 || page >= result.total_pages {
            break;
        }
        page += 1;
    }
    Ok(orders)
}

/// Loads the report orders for the selected range and filters.
///
/// Counts cover every order in range matching the search, so the status
/// tabs keep their numbers while one of them is selected.
pub fn load_report_orders<R>(
    repo: &R,
    query: &TableQuery,
    today: NaiveDate,
    per_page: usize,
) -> ServiceResult<ReportOrdersPageData>
where
    R: ReportReader + ?Sized,
{
    let Selection {
        filters,
        status,
        query: order_query,
    } = select_orders(query, today)?;

    let orders = fetch_all_orders(repo, &order_query)?;
    let counts = StatusCounts::tally(orders.iter().map(|order| order.status));
    let orders: Vec<ReportOrder> = orders
        .into_iter()
        .filter(|order| status.matches(order.status))
        .collect();

    Ok(ReportOrdersPageData {
        orders: Paginated::from_vec(orders, query.page(), per_page),
        counts,
        filters,
    })
}

/// Applies an inline status/delivery edit to one order.
pub fn update_report_order<R>(
    repo: &R,
    order_id: &str,
    form: UpdateReportOrderForm,
) -> ServiceResult<()>
where
    R: ReportWriter + ?Sized,
{
    let id = OrderId::new(order_id)?;
    let update = UpdateReportOrder::try_from(form)?;

    repo.update_report_order(&id, &update).map_err(|err| {
        log::error!("Failed to update report order {id}: {err}");
        err
    })?;

    log::info!("Updated report order {id}");
    Ok(())
}

/// Exports the currently visible page.
pub fn export_report_page<R>(
    repo: &R,
    query: &TableQuery,
    today: NaiveDate,
    per_page: usize,
) -> ServiceResult<CsvDownload>
where
    R: ReportReader + ?Sized,
{
    let data = load_report_orders(repo, query, today, per_page)?;
    let body = to_csv(&data.orders.items).map_err(|err| {
        log::error!("Failed to export report orders: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    Ok(CsvDownload {
        filename: export_filename("report-orders-page", today),
        body,
    })
}

/// Exports every matching order through the backend export endpoint.
pub fn export_report_orders_full<R>(
    repo: &R,
    query: &TableQuery,
    today: NaiveDate,
) -> ServiceResult<CsvDownload>
where
    R: ReportReader + ?Sized,
{
    let Selection {
        status,
        query: order_query,
        ..
    } = select_orders(query, today)?;

    let body = repo.export_report_orders(&order_query.status(status)).map_err(|err| {
        log::error!("Failed to export all report orders: {err}");
        err
    })?;

    Ok(CsvDownload {
        filename: export_filename("report-orders", today),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Page;
    use crate::repository::mock::MockRepository;
    use crate::selection::fixtures::report_order;
    use crate::status::DeliveryStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn orders() -> Vec<ReportOrder> {
        let mut orders: Vec<ReportOrder> = (1..=7)
            .map(|i| report_order(&format!("p{i}"), "paid", DeliveryStatus::Pending))
            .collect();
        for i in 1..=3 {
            orders.push(report_order(&format!("f{i}"), "in-progress", DeliveryStatus::Failed));
        }
        orders
    }

    fn single_page(repo: &mut MockRepository, orders: Vec<ReportOrder>) {
        repo.expect_list_report_orders()
            .withf(|q| q.status == StatusFilter::All && q.pagination.map(|p| p.page) == Some(1))
            .times(1)
            .returning(move |_| {
                Ok(Page {
                    total: orders.len(),
                    items: orders.clone(),
                    total_pages: 1,
                })
            });
    }

    #[test]
    fn listing_is_requested_without_status() {
        let mut repo = MockRepository::new();
        repo.expect_list_report_orders()
            .withf(|q| q.status == StatusFilter::All && q.search.as_deref() == Some("ravi"))
            .times(1)
            .returning(|_| {
                Ok(Page {
                    items: vec![],
                    total: 0,
                    total_pages: 0,
                })
            });
        let query = TableQuery {
            status: Some("failed".to_string()),
            search: Some(" Ravi".to_string()),
            ..TableQuery::default()
        };

        let data = load_report_orders(&repo, &query, today(), 20).unwrap();

        assert_eq!(data.filters.status, "failed");
        assert!(data.orders.items.is_empty());
    }

    #[test]
    fn failed_filter_includes_in_progress_orders() {
        let mut repo = MockRepository::new();
        single_page(&mut repo, orders());
        let query = TableQuery {
            status: Some("failed".to_string()),
            ..TableQuery::default()
        };

        let data = load_report_orders(&repo, &query, today(), 20).unwrap();

        let ids: Vec<&str> = data.orders.items.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2", "f3"]);
        assert_eq!(data.orders.total, 3);
    }

    #[test]
    fn counts_ignore_selected_status() {
        let mut repo = MockRepository::new();
        single_page(&mut repo, orders());
        let query = TableQuery {
            status: Some("paid".to_string()),
            ..TableQuery::default()
        };

        let data = load_report_orders(&repo, &query, today(), 20).unwrap();

        assert_eq!(data.orders.total, 7);
        assert_eq!(data.counts.all, 10);
        assert_eq!(data.counts.get(ReportStatus::Paid), 7);
        assert_eq!(data.counts.get(ReportStatus::Failed), 3);
        assert_eq!(data.counts.get(ReportStatus::Delivered), 0);
    }

    #[test]
    fn every_backend_page_is_fetched() {
        let mut repo = MockRepository::new();
        repo.expect_list_report_orders()
            .times(2)
            .returning(|q| {
                let page = q.pagination.map_or(1, |p| p.page);
                Ok(Page {
                    items: vec![report_order(&format!("o{page}"), "paid", DeliveryStatus::Pending)],
                    total: 2,
                    total_pages: 2,
                })
            });
        let query = TableQuery {
            page: Some(2),
            ..TableQuery::default()
        };

        let data = load_report_orders(&repo, &query, today(), 1).unwrap();

        assert_eq!(data.counts.all, 2);
        assert_eq!(data.orders.page, 2);
        assert_eq!(data.orders.items[0].id.as_str(), "o2");
    }

    #[test]
    fn empty_update_never_reaches_backend() {
        let mut repo = MockRepository::new();
        repo.expect_update_report_order().never();
        let form = UpdateReportOrderForm {
            status: None,
            delivery_status: None,
            drive_url: None,
        };

        assert!(matches!(
            update_report_order(&repo, "o1", form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn update_sends_delivery_change() {
        let mut repo = MockRepository::new();
        repo.expect_update_report_order()
            .withf(|id, update| {
                id.as_str() == "o1" && update.delivery_status == Some(DeliveryStatus::Delivered)
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let form = UpdateReportOrderForm {
            status: None,
            delivery_status: Some("delivered".to_string()),
            drive_url: Some("https://drive.example.com/f/1".to_string()),
        };

        assert!(update_report_order(&repo, "o1", form).is_ok());
    }

    #[test]
    fn full_export_proxies_backend_body() {
        let mut repo = MockRepository::new();
        repo.expect_export_report_orders()
            .withf(|q| q.pagination.is_none() && q.status == StatusFilter::All)
            .returning(|_| Ok("\"Order\"\r\n\"#LJR-1\"\r\n".to_string()));

        let download = export_report_orders_full(&repo, &TableQuery::default(), today()).unwrap();

        assert_eq!(download.body, "\"Order\"\r\n\"#LJR-1\"\r\n");
        assert_eq!(download.filename, "report-orders-2026-03-14.csv");
    }

    #[test]
    fn full_export_forwards_status_filter() {
        let mut repo = MockRepository::new();
        repo.expect_export_report_orders()
            .withf(|q| q.status == StatusFilter::Only(ReportStatus::Failed))
            .times(1)
            .returning(|_| Ok(String::new()));
        let query = TableQuery {
            status: Some("in-progress".to_string()),
            ..TableQuery::default()
        };

        assert!(export_report_orders_full(&repo, &query, today()).is_ok());
    }
}
