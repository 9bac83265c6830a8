//! DTOs used by the report order and report automation pages.

use serde::Deserialize;

use crate::domain::report::ReportOrder;
use crate::domain::types::OrderId;
use crate::dto::{TableFilters, TableQuery};
use crate::pagination::Paginated;
use crate::status::StatusCounts;

pub struct ReportOrdersPageData {
    pub orders: Paginated<ReportOrder>,
    /// Counts over the range and search, before the status filter.
    pub counts: StatusCounts,
    pub filters: TableFilters,
}

/// Query of the automation page: the table toolbar plus the pre-select count.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AutomationQuery {
    pub range: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    /// How many undelivered orders to pre-select on the current page.
    pub select: Option<usize>,
}

impl AutomationQuery {
    pub fn table(&self) -> TableQuery {
        TableQuery {
            range: self.range.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            status: self.status.clone(),
            search: self.search.clone(),
            page: self.page,
        }
    }
}

pub struct AutomationPageData {
    pub orders: Paginated<ReportOrder>,
    /// Pre-selected ids, taken from the current page only.
    pub selected: Vec<OrderId>,
    pub select_count: usize,
    /// Undelivered orders across every page of the filtered queue.
    pub undelivered: usize,
    pub counts: StatusCounts,
    pub filters: TableFilters,
}
