use serde::{Deserialize, Serialize};

use crate::domain::admin::{Admin, AdminRole, NewAdmin};
use crate::domain::types::{AdminId, Email, TypeConstraintError, Username};

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Wire model for [`crate::domain::admin::Admin`].
pub struct AdminRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl TryFrom<AdminRecord> for Admin {
    type Error = TypeConstraintError;

    fn try_from(record: AdminRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AdminId::new(record.id)?,
            username: Username::new(record.username)?,
            email: Email::new(record.email)?,
            role: AdminRole::try_from(record.role.as_str())
                .map_err(TypeConstraintError::InvalidValue)?,
            active: record.is_active,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `data` of a successful `POST /api/admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminRecord,
}

#[derive(Debug, Serialize)]
pub struct CreateAdminPayload<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: AdminRole,
}

impl<'a> From<&'a NewAdmin> for CreateAdminPayload<'a> {
    fn from(admin: &'a NewAdmin) -> Self {
        Self {
            username: admin.username.as_str(),
            email: admin.email.as_str(),
            password: admin.password.expose(),
            role: admin.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAdminPasswordPayload<'a> {
    pub admin_id: &'a str,
    pub new_password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Password;

    #[test]
    fn converts_admin_record() {
        let record: AdminRecord = serde_json::from_str(
            r#"{"_id": "ad1", "username": "root", "email": "Root@Example.com", "role": "SUPER_ADMIN"}"#,
        )
        .unwrap();

        let admin = Admin::try_from(record).unwrap();

        assert_eq!(admin.role, AdminRole::SuperAdmin);
        assert!(admin.active);
        assert_eq!(admin.email.as_str(), "root@example.com");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let record: AdminRecord = serde_json::from_str(
            r#"{"_id": "ad1", "username": "root", "email": "root@example.com", "role": "OWNER"}"#,
        )
        .unwrap();
        assert!(Admin::try_from(record).is_err());
    }

    #[test]
    fn create_payload_serializes_role() {
        let admin = NewAdmin {
            username: Username::new("ops").unwrap(),
            email: Email::new("ops@example.com").unwrap(),
            password: Password::new("secret1").unwrap(),
            role: AdminRole::Admin,
        };
        let json = serde_json::to_value(CreateAdminPayload::from(&admin)).unwrap();
        assert_eq!(json["role"], "ADMIN");
        assert_eq!(json["password"], "secret1");
    }
}
