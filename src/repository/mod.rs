//! Backend access: reader/writer traits per resource and the HTTP
//! implementation used in production.

use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::date_range::DateRange;
use crate::domain::admin::{Admin, NewAdmin, PasswordChange};
use crate::domain::astrologer::{Astrologer, UpdateAstrologer};
use crate::domain::consultation::ConsultationLog;
use crate::domain::puja::{PujaBooking, PujaDraft};
use crate::domain::report::{ReportOrder, UpdateReportOrder};
use crate::domain::route::{NewFolder, NewRoute, SidebarRoute, UpdateRoute};
use crate::domain::slot::{AvailableSlot, BlockedSlot, NewBlockedRange, SlotQuery};
use crate::domain::types::{
    AdminId, AstrologerId, BlockedSlotId, OrderId, Password, PujaId, RouteId, TypeConstraintError,
};
use crate::models::report::ProcessSummary;
use crate::models::{Envelope, PageMeta};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::status::{IN_PROGRESS, ReportStatus, StatusFilter, StatusKind};

pub mod admin;
pub mod astrologer;
pub mod auth;
pub mod consultation;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod puja;
pub mod report;
pub mod route;
pub mod slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Filters of the report orders table and its full export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOrderQuery {
    pub status: StatusFilter<ReportStatus>,
    pub search: Option<String>,
    pub range: Option<DateRange>,
    pub pagination: Option<Pagination>,
}

impl ReportOrderQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: StatusFilter<ReportStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    /// Query string parameters understood by the orders endpoints.
    ///
    /// `Failed` also asks for the raw `in-progress` value the backend still
    /// stores for some orders.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        match self.status {
            StatusFilter::All => {}
            StatusFilter::Only(ReportStatus::Failed) => {
                params.push(("status", ReportStatus::Failed.as_str().to_string()));
                params.push(("status", IN_PROGRESS.to_string()));
            }
            StatusFilter::Only(status) => params.push(("status", status.as_str().to_string())),
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(range) = &self.range {
            params.extend(range.query_params());
        }
        if let Some(pagination) = self.pagination {
            params.push(("page", pagination.page.to_string()));
            params.push(("limit", pagination.per_page.to_string()));
        }
        params
    }
}

/// A page of results and the total reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub total_pages: usize,
}

pub trait AuthGateway {
    /// Exchanges credentials for an access token and the admin record.
    fn login(&self, email: &str, password: &str) -> RepositoryResult<(String, Admin)>;
}

pub trait ConsultationReader {
    fn list_consultation_logs(&self, range: &DateRange) -> RepositoryResult<Vec<ConsultationLog>>;
}

pub trait PujaReader {
    fn list_puja_bookings(&self, range: &DateRange) -> RepositoryResult<Vec<PujaBooking>>;
    fn get_puja(&self, id: &PujaId) -> RepositoryResult<Option<PujaDraft>>;
}

pub trait PujaWriter {
    fn create_puja(&self, draft: &PujaDraft) -> RepositoryResult<()>;
    fn update_puja(&self, id: &PujaId, draft: &PujaDraft) -> RepositoryResult<()>;
}

pub trait ReportReader {
    fn list_report_orders(&self, query: &ReportOrderQuery) -> RepositoryResult<Page<ReportOrder>>;
    /// Raw CSV produced by the backend export endpoint.
    fn export_report_orders(&self, query: &ReportOrderQuery) -> RepositoryResult<String>;
    /// Orders waiting in the report automation queue.
    fn list_pending_reports(&self) -> RepositoryResult<Vec<ReportOrder>>;
}

pub trait ReportWriter {
    fn update_report_order(&self, id: &OrderId, update: &UpdateReportOrder)
    -> RepositoryResult<()>;
    fn process_reports(&self, ids: &[OrderId]) -> RepositoryResult<ProcessSummary>;
}

pub trait SlotReader {
    fn list_available_slots(&self, query: &SlotQuery) -> RepositoryResult<Vec<AvailableSlot>>;
    fn list_blocked_slots(&self, query: &SlotQuery) -> RepositoryResult<Vec<BlockedSlot>>;
}

pub trait SlotWriter {
    fn block_range(&self, range: &NewBlockedRange) -> RepositoryResult<()>;
    fn unblock_slot(&self, id: &BlockedSlotId) -> RepositoryResult<()>;
}

pub trait AdminReader {
    fn list_admins(&self) -> RepositoryResult<Vec<Admin>>;
}

pub trait AdminWriter {
    fn create_admin(&self, admin: &NewAdmin) -> RepositoryResult<()>;
    fn delete_admin(&self, id: &AdminId) -> RepositoryResult<()>;
    fn change_password(&self, change: &PasswordChange) -> RepositoryResult<()>;
    fn change_admin_password(&self, id: &AdminId, password: &Password) -> RepositoryResult<()>;
}

pub trait AstrologerReader {
    fn list_astrologers(&self) -> RepositoryResult<Vec<Astrologer>>;
    fn get_astrologer(&self, id: &AstrologerId) -> RepositoryResult<Option<Astrologer>>;
}

pub trait AstrologerWriter {
    fn update_astrologer(&self, update: &UpdateAstrologer) -> RepositoryResult<()>;
}

pub trait RouteReader {
    /// Navigation visible to the signed-in admin.
    fn list_sidebar(&self) -> RepositoryResult<Vec<SidebarRoute>>;
    /// Every route, for the management screen.
    fn list_all_routes(&self) -> RepositoryResult<Vec<SidebarRoute>>;
}

pub trait RouteWriter {
    fn create_route(&self, route: &NewRoute) -> RepositoryResult<()>;
    fn create_folder(&self, folder: &NewFolder) -> RepositoryResult<()>;
    fn update_route(&self, id: &RouteId, route: &UpdateRoute) -> RepositoryResult<()>;
    fn delete_route(&self, id: &RouteId) -> RepositoryResult<()>;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Platform REST backend client.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApiRepository {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Returns a handle sending `Authorization: Bearer <token>` on every call.
    pub fn authorized(&self, token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..self.clone()
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    fn send(&self, request: RequestBuilder) -> RepositoryResult<reqwest::blocking::Response> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.message.or(body.error));
        log::warn!("Backend responded {status}: {message:?}");
        Err(RepositoryError::from_status(status, message))
    }

    fn envelope<T: DeserializeOwned>(&self, request: RequestBuilder) -> RepositoryResult<Envelope<T>> {
        let response = self.send(request)?;
        let status = response.status();
        let envelope: Envelope<T> = response
            .json()
            .map_err(|e| RepositoryError::ValidationError(format!("Malformed response: {e}")))?;
        if !envelope.success {
            return Err(RepositoryError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            });
        }
        Ok(envelope)
    }

    /// Sends the request and returns the envelope `data`.
    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> RepositoryResult<T> {
        self.envelope(request)?
            .data
            .ok_or_else(|| RepositoryError::ValidationError("Response carries no data".to_string()))
    }

    /// Sends the request and returns `data` with the paging block.
    fn fetch_page<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> RepositoryResult<(Vec<T>, Option<PageMeta>)> {
        let envelope = self.envelope::<Vec<T>>(request)?;
        Ok((envelope.data.unwrap_or_default(), envelope.pagination))
    }

    /// Sends the request, ignoring any payload.
    fn execute(&self, request: RequestBuilder) -> RepositoryResult<()> {
        self.envelope::<serde_json::Value>(request).map(|_| ())
    }

    /// Sends the request and returns the raw body text.
    fn text(&self, request: RequestBuilder) -> RepositoryResult<String> {
        Ok(self.send(request)?.text()?)
    }
}

/// Converts list records, logging and skipping the ones that fail validation.
pub(crate) fn convert_lenient<W, D>(records: Vec<W>, what: &str) -> Vec<D>
where
    D: TryFrom<W, Error = TypeConstraintError>,
{
    records
        .into_iter()
        .filter_map(|record| match D::try_from(record) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Skipping invalid {what} record: {err}");
                None
            }
        })
        .collect()
}

/// Converts wire records into domain values, failing on the first invalid one.
/// Used for slot lists, where a skipped record would hide a block.
pub(crate) fn convert_all<W, D>(records: Vec<W>) -> RepositoryResult<Vec<D>>
where
    D: TryFrom<W, Error = TypeConstraintError>,
{
    records
        .into_iter()
        .map(D::try_from)
        .collect::<Result<Vec<D>, TypeConstraintError>>()
        .map_err(RepositoryError::from)
}

/// Treats `NotFound` as an absent value.
pub(crate) fn optional<T>(result: RepositoryResult<T>) -> RepositoryResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(RepositoryError::NotFound) => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn report_query_params() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
        )
        .unwrap();
        let query = ReportOrderQuery::new()
            .status(StatusFilter::Only(ReportStatus::Failed))
            .search("  ravi ")
            .range(range)
            .paginate(2, 20);

        let params = query.params();

        assert_eq!(
            params,
            vec![
                ("status", "failed".to_string()),
                ("status", "in-progress".to_string()),
                ("search", "ravi".to_string()),
                ("startDate", "2026-03-01".to_string()),
                ("endDate", "2026-03-07".to_string()),
                ("page", "2".to_string()),
                ("limit", "20".to_string()),
            ]
        );
    }

    #[test]
    fn single_status_filter_sends_one_value() {
        let query = ReportOrderQuery::new().status(StatusFilter::Only(ReportStatus::Paid));
        assert_eq!(query.params(), vec![("status", "paid".to_string())]);
    }

    #[test]
    fn unfiltered_query_has_no_params() {
        assert!(ReportOrderQuery::new().search("   ").params().is_empty());
    }

    #[test]
    fn lenient_conversion_skips_invalid_records() {
        let records = vec!["o1".to_string(), String::new(), "o3".to_string()];

        let ids: Vec<OrderId> = convert_lenient(records.clone(), "order");

        assert_eq!(ids, vec![OrderId::new("o1").unwrap(), OrderId::new("o3").unwrap()]);
        assert!(convert_all::<String, OrderId>(records).is_err());
    }

    #[test]
    fn authorized_keeps_base_url() {
        let repo = ApiRepository::new("http://backend.local/", Duration::from_secs(1)).unwrap();
        let authed = repo.authorized("tok");
        assert_eq!(authed.base_url, "http://backend.local");
        assert_eq!(authed.token.as_deref(), Some("tok"));
        assert!(repo.token.is_none());
    }
}
