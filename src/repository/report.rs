//! Report orders and the report automation queue.

use reqwest::Method;

use crate::domain::report::{ReportOrder, UpdateReportOrder};
use crate::domain::types::OrderId;
use crate::models::report::{
    ProcessReportsPayload, ProcessSummary, ReportOrderRecord, UpdateReportOrderPayload,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ApiRepository, Page, ReportOrderQuery, ReportReader, ReportWriter, convert_lenient,
};

impl ReportReader for ApiRepository {
    fn list_report_orders(&self, query: &ReportOrderQuery) -> RepositoryResult<Page<ReportOrder>> {
        let request = self
            .get("/api/admin/life-journey-orders")
            .query(&query.params());

        let (records, meta) = self.fetch_page::<ReportOrderRecord>(request)?;
        let items: Vec<ReportOrder> = convert_lenient(records, "report order");
        let (total, total_pages) = match meta {
            Some(meta) => (meta.total, meta.total_pages),
            None => (items.len(), usize::from(!items.is_empty())),
        };
        Ok(Page {
            items,
            total,
            total_pages,
        })
    }

    fn export_report_orders(&self, query: &ReportOrderQuery) -> RepositoryResult<String> {
        let mut params = query.params();
        params.retain(|(key, _)| *key != "page" && *key != "limit");
        let request = self
            .get("/api/admin/life-journey-orders/export")
            .query(&params);
        self.text(request)
    }

    fn list_pending_reports(&self) -> RepositoryResult<Vec<ReportOrder>> {
        let records: Vec<ReportOrderRecord> = self.fetch(self.get("/api/admin/get-reports"))?;
        Ok(convert_lenient(records, "report order"))
    }
}

impl ReportWriter for ApiRepository {
    fn update_report_order(
        &self,
        id: &OrderId,
        update: &UpdateReportOrder,
    ) -> RepositoryResult<()> {
        let request = self
            .request(Method::PATCH, &format!("/api/admin/life-journey-orders/{id}"))
            .json(&UpdateReportOrderPayload::from(update));
        self.execute(request)
    }

    fn process_reports(&self, ids: &[OrderId]) -> RepositoryResult<ProcessSummary> {
        let request = self
            .request(
                Method::POST,
                "/api/life-journey-report/process-lcr-reports",
            )
            .json(&ProcessReportsPayload::new(ids));
        let envelope = self.envelope::<ProcessSummary>(request)?;
        Ok(envelope.data.unwrap_or(ProcessSummary {
            processed: ids.len(),
            failed: 0,
        }))
    }
}
