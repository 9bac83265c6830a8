//! Signed-in operator stored in the identity cookie.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::admin::{Admin, AdminRole};
use crate::domain::types::{AdminId, TypeConstraintError};
use crate::models::config::ServerConfig;

/// Claims of the session token kept by `actix-identity`.
///
/// `access_token` is the backend bearer token; it is never rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminSession {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
    pub access_token: String,
    pub exp: usize,
}

/// Operator fields exposed to templates.
#[derive(Debug, Serialize)]
pub struct CurrentUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub role: AdminRole,
    pub is_super_admin: bool,
}

impl AdminSession {
    pub fn new(admin: &Admin, access_token: String, ttl_secs: i64) -> Self {
        let exp = (Utc::now() + Duration::seconds(ttl_secs)).timestamp().max(0) as usize;
        Self {
            sub: admin.id.to_string(),
            username: admin.username.to_string(),
            email: admin.email.to_string(),
            role: admin.role,
            access_token,
            exp,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }

    pub fn admin_id(&self) -> Result<AdminId, TypeConstraintError> {
        AdminId::new(self.sub.as_str())
    }

    pub fn current_user(&self) -> CurrentUser<'_> {
        CurrentUser {
            username: &self.username,
            email: &self.email,
            role: self.role,
            is_super_admin: self.is_super_admin(),
        }
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => identity,
            Err(err) => return ready(Err(err)),
        };

        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("Server config is not registered");
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "server misconfigured",
            )));
        };

        let token = match identity.id() {
            Ok(token) => token,
            Err(err) => {
                log::warn!("Failed to read identity: {err}");
                return ready(Err(actix_web::error::ErrorUnauthorized("not signed in")));
            }
        };

        ready(
            AdminSession::from_jwt(&token, &config.secret).map_err(|err| {
                log::warn!("Rejected session token: {err}");
                actix_web::error::ErrorUnauthorized("invalid session")
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Email, Username};

    fn admin() -> Admin {
        Admin {
            id: AdminId::new("ad1").unwrap(),
            username: Username::new("root").unwrap(),
            email: Email::new("root@example.com").unwrap(),
            role: AdminRole::SuperAdmin,
            active: true,
        }
    }

    #[test]
    fn jwt_round_trip_keeps_backend_token() {
        let session = AdminSession::new(&admin(), "backend".to_string(), 3600);
        let token = session.to_jwt("secret").unwrap();

        let decoded = AdminSession::from_jwt(&token, "secret").unwrap();

        assert_eq!(decoded, session);
        assert!(decoded.is_super_admin());
        assert!(AdminSession::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn expired_session_is_rejected() {
        let session = AdminSession::new(&admin(), "backend".to_string(), -3600);
        let token = session.to_jwt("secret").unwrap();
        assert!(AdminSession::from_jwt(&token, "secret").is_err());
    }
}
