//! DTOs used by the consultation log dashboard.

use crate::domain::consultation::ConsultationLog;
use crate::dto::TableFilters;
use crate::pagination::Paginated;
use crate::status::StatusCounts;

/// Data required to render the consultation dashboard.
pub struct ConsultationsPageData {
    pub logs: Paginated<ConsultationLog>,
    /// Counts over the whole date range, before the status filter.
    pub counts: StatusCounts,
    pub filters: TableFilters,
}
