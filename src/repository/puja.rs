//! Puja definitions and bookings.

use reqwest::Method;

use crate::date_range::DateRange;
use crate::domain::puja::{PujaBooking, PujaDraft};
use crate::domain::types::PujaId;
use crate::models::puja::{PujaBookingRecord, PujaRecord};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ApiRepository, PujaReader, PujaWriter, convert_lenient, optional};

impl PujaReader for ApiRepository {
    fn list_puja_bookings(&self, range: &DateRange) -> RepositoryResult<Vec<PujaBooking>> {
        let request = self
            .get("/api/puja-new/get_all_puja_bookings")
            .query(&range.query_params());

        let records: Vec<PujaBookingRecord> = self.fetch(request)?;
        Ok(convert_lenient(records, "puja booking"))
    }

    fn get_puja(&self, id: &PujaId) -> RepositoryResult<Option<PujaDraft>> {
        let request = self.get(&format!("/api/puja-new/get-puja/{id}"));

        let Some(record) = optional(self.fetch::<PujaRecord>(request))? else {
            return Ok(None);
        };
        let mut draft = PujaDraft::try_from(record).map_err(RepositoryError::from)?;
        draft.id = Some(id.clone());
        Ok(Some(draft))
    }
}

impl PujaWriter for ApiRepository {
    fn create_puja(&self, draft: &PujaDraft) -> RepositoryResult<()> {
        let request = self
            .request(Method::POST, "/api/puja-new/create_puja")
            .json(&PujaRecord::from(draft));
        self.execute(request)
    }

    fn update_puja(&self, id: &PujaId, draft: &PujaDraft) -> RepositoryResult<()> {
        let request = self
            .request(Method::PUT, &format!("/api/puja-new/update-puja/{id}"))
            .json(&PujaRecord::from(draft));
        self.execute(request)
    }
}
