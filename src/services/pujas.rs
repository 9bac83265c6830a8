//! Puja bookings table and its CSV export.

use chrono::NaiveDate;

use crate::domain::puja::PujaBooking;
use crate::dto::pujas::BookingsPageData;
use crate::dto::{TableFilters, TableQuery};
use crate::export::{export_filename, to_csv};
use crate::pagination::Paginated;
use crate::repository::PujaReader;
use crate::services::{CsvDownload, ServiceError, ServiceResult};
use crate::status::{PaymentStatus, StatusCounts, StatusFilter};

fn matches_search(booking: &PujaBooking, term: &str) -> bool {
    booking.sankalp.name.to_lowercase().contains(term)
        || booking.puja.title.to_lowercase().contains(term)
        || booking.id.as_str().to_lowercase().contains(term)
        || booking
            .payment
            .transaction_id
            .as_deref()
            .is_some_and(|txn| txn.to_lowercase().contains(term))
}

fn select_bookings<R>(
    repo: &R,
    query: &TableQuery,
    today: NaiveDate,
) -> ServiceResult<(TableFilters, StatusFilter<PaymentStatus>, Vec<PujaBooking>)>
where
    R: PujaReader + ?Sized,
{
    let (preset, range) = query.date_range(today)?;
    let status = StatusFilter::<PaymentStatus>::parse(query.status.as_deref())
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let search = query.search_term();

    let mut bookings = repo.list_puja_bookings(&range).map_err(|err| {
        log::error!("Failed to load puja bookings: {err}");
        err
    })?;
    if let Some(term) = &search {
        bookings.retain(|booking| matches_search(booking, term));
    }

    Ok((
        TableFilters::new(preset, range, status.as_str(), search),
        status,
        bookings,
    ))
}

pub fn load_bookings<R>(
    repo: &R,
    query: &TableQuery,
    today: NaiveDate,
    per_page: usize,
) -> ServiceResult<BookingsPageData>
where
    R: PujaReader + ?Sized,
{
    let (filters, status, bookings) = select_bookings(repo, query, today)?;

    let counts = StatusCounts::tally(bookings.iter().map(|b| b.payment_status));
    let bookings: Vec<PujaBooking> = bookings
        .into_iter()
        .filter(|b| status.matches(b.payment_status))
        .collect();

    Ok(BookingsPageData {
        bookings: Paginated::from_vec(bookings, query.page(), per_page),
        counts,
        filters,
    })
}

pub fn export_bookings<R>(
    repo: &R,
    query: &TableQuery,
    today: NaiveDate,
) -> ServiceResult<CsvDownload>
where
    R: PujaReader + ?Sized,
{
    let (_, status, bookings) = select_bookings(repo, query, today)?;
    let bookings: Vec<PujaBooking> = bookings
        .into_iter()
        .filter(|b| status.matches(b.payment_status))
        .collect();

    let body = to_csv(&bookings).map_err(|err| {
        log::error!("Failed to export puja bookings: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    Ok(CsvDownload {
        filename: export_filename("puja-bookings", today),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::puja::{BookedPuja, BookingPayment, SankalpPerson};
    use crate::domain::types::BookingId;
    use crate::repository::mock::MockRepository;

    fn booking(id: &str, name: &str, status: PaymentStatus) -> PujaBooking {
        PujaBooking {
            id: BookingId::new(id).unwrap(),
            puja: BookedPuja {
                title: "Rudrabhishek".to_string(),
                date: None,
                package_name: Some("Individual".to_string()),
            },
            sankalp: SankalpPerson {
                name: name.to_string(),
                gotra: None,
                family_members: Vec::new(),
            },
            delivery_address: None,
            payment: BookingPayment {
                amount: 1100.0,
                transaction_id: Some(format!("pay_{id}")),
            },
            payment_status: status,
            created_at: NaiveDate::from_ymd_opt(2026, 3, 10)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        }
    }

    fn bookings() -> Vec<PujaBooking> {
        vec![
            booking("b1", "Anita \"Annie\" Rao", PaymentStatus::Successful),
            booking("b2", "Vikram", PaymentStatus::Pending),
            booking("b3", "Meera", PaymentStatus::Successful),
        ]
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn filters_by_payment_status() {
        let mut repo = MockRepository::new();
        repo.expect_list_puja_bookings().returning(|_| Ok(bookings()));
        let query = TableQuery {
            status: Some("successful".to_string()),
            ..TableQuery::default()
        };

        let data = load_bookings(&repo, &query, today(), 20).unwrap();

        assert_eq!(data.bookings.items.len(), 2);
        assert_eq!(data.counts.get(PaymentStatus::Pending), 1);
    }

    #[test]
    fn search_matches_transaction_id() {
        let mut repo = MockRepository::new();
        repo.expect_list_puja_bookings().returning(|_| Ok(bookings()));
        let query = TableQuery {
            search: Some("PAY_B2".to_string()),
            ..TableQuery::default()
        };

        let data = load_bookings(&repo, &query, today(), 20).unwrap();

        assert_eq!(data.bookings.items.len(), 1);
        assert_eq!(data.bookings.items[0].sankalp.name, "Vikram");
    }

    #[test]
    fn export_doubles_embedded_quotes() {
        let mut repo = MockRepository::new();
        repo.expect_list_puja_bookings().returning(|_| Ok(bookings()));

        let download = export_bookings(&repo, &TableQuery::default(), today()).unwrap();

        assert_eq!(download.body.lines().count(), 4);
        assert!(download.body.contains("\"Anita \"\"Annie\"\" Rao\""));
    }
}
