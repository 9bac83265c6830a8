//! Screen services: role checks, validation and orchestration of backend calls.
//!
//! Every service is a plain synchronous function generic over the repository
//! traits it needs, so handlers can run it on the blocking pool and tests can
//! pass a `MockRepository`.

use thiserror::Error;

use crate::models::auth::AdminSession;
use crate::repository::errors::RepositoryError;

pub mod admins;
pub mod astrologers;
pub mod auth;
pub mod automation;
pub mod consultations;
pub mod editor;
pub mod navigation;
pub mod pujas;
pub mod reports;
pub mod sidebar;
pub mod slots;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backend rejected the operator's session.
    #[error("session is not authorized")]
    Unauthorized,

    /// The operator's role does not allow the action.
    #[error("insufficient permissions")]
    Forbidden,

    #[error("not found")]
    NotFound,

    /// User-facing validation message.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Unauthorized => ServiceError::Unauthorized,
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Restricts account and route management to super admins.
pub fn ensure_super_admin(user: &AdminSession) -> ServiceResult<()> {
    if user.is_super_admin() {
        Ok(())
    } else {
        log::warn!("Admin {} attempted a super admin action", user.email);
        Err(ServiceError::Forbidden)
    }
}

/// Report-style CSV download produced by a service.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvDownload {
    pub filename: String,
    pub body: String,
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::admin::AdminRole;

    #[test]
    fn repository_errors_keep_auth_meaning() {
        assert!(matches!(
            ServiceError::from(RepositoryError::Unauthorized),
            ServiceError::Unauthorized
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConnectionError("timeout".into())),
            ServiceError::Repository(_)
        ));
    }

    #[test]
    fn only_super_admins_pass() {
        assert!(ensure_super_admin(&fixtures::session(AdminRole::SuperAdmin)).is_ok());
        assert!(matches!(
            ensure_super_admin(&fixtures::session(AdminRole::Admin)),
            Err(ServiceError::Forbidden)
        ));
    }
}
