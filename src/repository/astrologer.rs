use reqwest::Method;

use crate::domain::astrologer::{Astrologer, UpdateAstrologer};
use crate::domain::types::AstrologerId;
use crate::models::astrologer::{AstrologerRecord, UpdateAstrologerPayload};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AstrologerReader, AstrologerWriter, ApiRepository, convert_lenient, optional};

impl AstrologerReader for ApiRepository {
    fn list_astrologers(&self) -> RepositoryResult<Vec<Astrologer>> {
        let records: Vec<AstrologerRecord> = self.fetch(self.get("/api/admin/astrologers"))?;
        Ok(convert_lenient(records, "astrologer"))
    }

    fn get_astrologer(&self, id: &AstrologerId) -> RepositoryResult<Option<Astrologer>> {
        let request = self.get(&format!("/api/admin/astrologer/{id}"));
        optional(self.fetch::<AstrologerRecord>(request))?
            .map(|record| Astrologer::try_from(record).map_err(RepositoryError::from))
            .transpose()
    }
}

impl AstrologerWriter for ApiRepository {
    fn update_astrologer(&self, update: &UpdateAstrologer) -> RepositoryResult<()> {
        let request = self
            .request(Method::POST, "/api/admin/update-astrologer")
            .json(&UpdateAstrologerPayload::from(update));
        self.execute(request)
    }
}
