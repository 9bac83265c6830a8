use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::types::{AdminId, Email, Password, Username};

/// Back-office permission level.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl AdminRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AdminRole::Admin => "ADMIN",
            AdminRole::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

impl Display for AdminRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AdminRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "ADMIN" => Ok(AdminRole::Admin),
            "SUPER_ADMIN" => Ok(AdminRole::SuperAdmin),
            other => Err(format!("unknown admin role `{other}`")),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Admin {
    pub id: AdminId,
    pub username: Username,
    pub email: Email,
    pub role: AdminRole,
    pub active: bool,
}

#[derive(Clone, Debug)]
pub struct NewAdmin {
    pub username: Username,
    pub email: Email,
    pub password: Password,
    pub role: AdminRole,
}

/// Password change for the signed-in admin.
#[derive(Clone, Debug)]
pub struct PasswordChange {
    pub current: String,
    pub new: Password,
}
