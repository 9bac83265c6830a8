//! Admin accounts.

use reqwest::Method;

use crate::domain::admin::{Admin, NewAdmin, PasswordChange};
use crate::domain::types::{AdminId, Password};
use crate::models::admin::{
    AdminRecord, ChangeAdminPasswordPayload, ChangePasswordPayload, CreateAdminPayload,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{AdminReader, AdminWriter, ApiRepository, convert_lenient};

impl AdminReader for ApiRepository {
    fn list_admins(&self) -> RepositoryResult<Vec<Admin>> {
        let records: Vec<AdminRecord> = self.fetch(self.get("/api/admin/admins"))?;
        Ok(convert_lenient(records, "admin"))
    }
}

impl AdminWriter for ApiRepository {
    fn create_admin(&self, admin: &NewAdmin) -> RepositoryResult<()> {
        let request = self
            .request(Method::POST, "/api/admin/create-admin")
            .json(&CreateAdminPayload::from(admin));
        self.execute(request)
    }

    fn delete_admin(&self, id: &AdminId) -> RepositoryResult<()> {
        self.execute(self.request(Method::DELETE, &format!("/api/admin/delete-admin/{id}")))
    }

    fn change_password(&self, change: &PasswordChange) -> RepositoryResult<()> {
        let request = self
            .request(Method::POST, "/api/admin/change-password")
            .json(&ChangePasswordPayload {
                current_password: &change.current,
                new_password: change.new.expose(),
            });
        self.execute(request)
    }

    fn change_admin_password(&self, id: &AdminId, password: &Password) -> RepositoryResult<()> {
        let request = self
            .request(Method::POST, "/api/admin/change-admin-password")
            .json(&ChangeAdminPasswordPayload {
                admin_id: id.as_str(),
                new_password: password.expose(),
            });
        self.execute(request)
    }
}
