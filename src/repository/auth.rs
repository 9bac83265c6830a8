//! Admin login against the platform backend.

use crate::domain::admin::Admin;
use crate::models::admin::{LoginRequest, LoginResponse};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ApiRepository, AuthGateway};

impl AuthGateway for ApiRepository {
    fn login(&self, email: &str, password: &str) -> RepositoryResult<(String, Admin)> {
        let request = self
            .request(reqwest::Method::POST, "/api/admin/login")
            .json(&LoginRequest { email, password });

        let response: LoginResponse = self.fetch(request)?;
        let admin = Admin::try_from(response.admin).map_err(RepositoryError::from)?;
        Ok((response.token, admin))
    }
}
