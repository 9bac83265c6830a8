//! Consultation log dashboard and its CSV export.

use chrono::NaiveDate;

use crate::domain::consultation::ConsultationLog;
use crate::dto::consultations::ConsultationsPageData;
use crate::dto::{TableFilters, TableQuery};
use crate::export::{export_filename, to_csv};
use crate::pagination::Paginated;
use crate::repository::ConsultationReader;
use crate::services::{CsvDownload, ServiceError, ServiceResult};
use crate::status::{ConsultationStatus, StatusCounts, StatusFilter};

fn matches_search(log: &ConsultationLog, term: &str) -> bool {
    log.customer_name.to_lowercase().contains(term)
        || log.astrologer_name.to_lowercase().contains(term)
        || log.id.as_str().to_lowercase().contains(term)
        || log
            .customer_phone
            .as_deref()
            .is_some_and(|phone| phone.contains(term))
}

struct Selection {
    filters: TableFilters,
    status: StatusFilter<ConsultationStatus>,
    /// Logs in range matching the search, before the status filter.
    logs: Vec<ConsultationLog>,
}

fn select_logs<R>(repo: &R, query: &TableQuery, today: NaiveDate) -> ServiceResult<Selection>
where
    R: ConsultationReader + ?Sized,
{
    let (preset, range) = query.date_range(today)?;
    let status = StatusFilter::<ConsultationStatus>::parse(query.status.as_deref())
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let search = query.search_term();

    let mut logs = repo.list_consultation_logs(&range).map_err(|err| {
        log::error!("Failed to load consultation logs: {err}");
        err
    })?;
    if let Some(term) = &search {
        logs.retain(|log| matches_search(log, term));
    }

    Ok(Selection {
        filters: TableFilters::new(preset, range, status.as_str(), search),
        status,
        logs,
    })
}

/// Loads the consultation logs for the selected range and filters.
pub fn load_consultations<R>(
    repo: &R,
    query: &TableQuery,
    today: NaiveDate,
    per_page: usize,
) -> ServiceResult<ConsultationsPageData>
where
    R: ConsultationReader + ?Sized,
{
    let Selection {
        filters,
        status,
        logs,
    } = select_logs(repo, query, today)?;

    let counts = StatusCounts::tally(logs.iter().map(|log| log.status));
    let logs: Vec<ConsultationLog> = logs
        .into_iter()
        .filter(|log| status.matches(log.status))
        .collect();

    Ok(ConsultationsPageData {
        logs: Paginated::from_vec(logs, query.page(), per_page),
        counts,
        filters,
    })
}

/// Exports every log matching the filters, not only the visible page.
pub fn export_consultations<R>(
    repo: &R,
    query: &TableQuery,
    today: NaiveDate,
) -> ServiceResult<CsvDownload>
where
    R: ConsultationReader + ?Sized,
{
    let Selection { status, logs, .. } = select_logs(repo, query, today)?;
    let logs: Vec<ConsultationLog> = logs
        .into_iter()
        .filter(|log| status.matches(log.status))
        .collect();

    let body = to_csv(&logs).map_err(|err| {
        log::error!("Failed to export consultation logs: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    Ok(CsvDownload {
        filename: export_filename("consultations", today),
        body,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::domain::consultation::ConsultationLog;
    use crate::domain::types::OrderId;

    pub fn consultation(id: &str, customer: &str, status: &str) -> ConsultationLog {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date");
        ConsultationLog {
            id: OrderId::new(id).expect("valid id"),
            customer_name: customer.to_string(),
            customer_phone: Some("+919812345678".to_string()),
            astrologer_name: "Pandit Sharma".to_string(),
            consultation_type: "call".to_string(),
            date,
            time_slot: Some("10:00AM-10:20AM".to_string()),
            duration_minutes: 20,
            status: status.parse().expect("valid status"),
            payment: None,
            created_at: date.and_hms_opt(9, 0, 0).expect("valid time"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::consultation;
    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn ten_logs() -> Vec<ConsultationLog> {
        let statuses = [
            "completed",
            "in-progress",
            "booked",
            "in-progress",
            "completed",
            "failed",
            "in-progress",
            "cancelled",
            "pending_payment",
            "completed",
        ];
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| consultation(&format!("c{i}"), &format!("Customer {i}"), status))
            .collect()
    }

    #[test]
    fn counts_fold_in_progress_into_failed() {
        let mut repo = MockRepository::new();
        repo.expect_list_consultation_logs()
            .withf(|range| range.from == NaiveDate::from_ymd_opt(2026, 3, 8).unwrap())
            .returning(|_| Ok(ten_logs()));

        let data = load_consultations(&repo, &TableQuery::default(), today(), 20).unwrap();

        assert_eq!(data.counts.all, 10);
        assert_eq!(data.counts.get(ConsultationStatus::Failed), 4);
        assert_eq!(data.counts.get(ConsultationStatus::Completed), 3);
        assert_eq!(data.logs.items.len(), 10);
    }

    #[test]
    fn status_filter_limits_rows_not_counts() {
        let mut repo = MockRepository::new();
        repo.expect_list_consultation_logs()
            .returning(|_| Ok(ten_logs()));
        let query = TableQuery {
            status: Some("failed".to_string()),
            ..TableQuery::default()
        };

        let data = load_consultations(&repo, &query, today(), 20).unwrap();

        assert_eq!(data.logs.items.len(), 4);
        assert_eq!(data.counts.all, 10);
        assert_eq!(data.filters.status, "failed");
    }

    #[test]
    fn search_matches_customer_name() {
        let mut repo = MockRepository::new();
        repo.expect_list_consultation_logs()
            .returning(|_| Ok(ten_logs()));
        let query = TableQuery {
            search: Some("customer 3".to_string()),
            ..TableQuery::default()
        };

        let data = load_consultations(&repo, &query, today(), 20).unwrap();

        assert_eq!(data.logs.items.len(), 1);
        assert_eq!(data.counts.all, 1);
    }

    #[test]
    fn unknown_status_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_list_consultation_logs().never();
        let query = TableQuery {
            status: Some("lost".to_string()),
            ..TableQuery::default()
        };

        assert!(matches!(
            load_consultations(&repo, &query, today(), 20),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn backend_failure_propagates() {
        let mut repo = MockRepository::new();
        repo.expect_list_consultation_logs()
            .returning(|_| Err(RepositoryError::ConnectionError("timeout".into())));

        assert!(matches!(
            load_consultations(&repo, &TableQuery::default(), today(), 20),
            Err(ServiceError::Repository(_))
        ));
    }

    #[test]
    fn export_has_one_line_per_row() {
        let mut repo = MockRepository::new();
        repo.expect_list_consultation_logs()
            .returning(|_| Ok(ten_logs()));

        let download = export_consultations(&repo, &TableQuery::default(), today()).unwrap();

        assert_eq!(download.filename, "consultations-2026-03-14.csv");
        assert_eq!(download.body.lines().count(), 11);
    }
}
