use crate::date_range::DateRange;
use crate::domain::consultation::ConsultationLog;
use crate::models::consultation::ConsultationLogRecord;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ApiRepository, ConsultationReader, convert_lenient};

impl ConsultationReader for ApiRepository {
    fn list_consultation_logs(&self, range: &DateRange) -> RepositoryResult<Vec<ConsultationLog>> {
        let request = self
            .get("/api/customers/all_consultation_logs")
            .query(&range.query_params());

        let records: Vec<ConsultationLogRecord> = self.fetch(request)?;
        Ok(convert_lenient(records, "consultation log"))
    }
}
