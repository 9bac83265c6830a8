//! Sign-in against the platform backend.

use validator::Validate;

use crate::domain::types::Email;
use crate::forms::auth::LoginForm;
use crate::models::auth::AdminSession;
use crate::repository::AuthGateway;
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Verifies the credentials with the backend and opens an operator session.
pub fn login<R>(repo: &R, form: LoginForm, session_ttl_secs: i64) -> ServiceResult<AdminSession>
where
    R: AuthGateway + ?Sized,
{
    let email = match Email::new(form.email.as_str()) {
        Ok(email) => email,
        Err(err) => {
            log::warn!("Rejected login email: {err}");
            return Err(ServiceError::Form(INVALID_CREDENTIALS.to_string()));
        }
    };
    if let Err(err) = form.validate() {
        log::warn!("Rejected login form: {err}");
        return Err(ServiceError::Form(INVALID_CREDENTIALS.to_string()));
    }

    let (token, admin) = repo.login(email.as_str(), &form.password).map_err(|err| match err {
        RepositoryError::Unauthorized
        | RepositoryError::NotFound
        | RepositoryError::Api { status: 400, .. } => {
            log::warn!("Failed login for {email}");
            ServiceError::Form(INVALID_CREDENTIALS.to_string())
        }
        other => {
            log::error!("Failed to sign in: {other}");
            ServiceError::from(other)
        }
    })?;

    if !admin.active {
        log::warn!("Inactive admin {email} tried to sign in");
        return Err(ServiceError::Form("This account is disabled".to_string()));
    }

    log::info!("Admin {} signed in", admin.email);
    Ok(AdminSession::new(&admin, token, session_ttl_secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::admin::{Admin, AdminRole};
    use crate::domain::types::{AdminId, Email, Username};
    use crate::repository::mock::MockRepository;

    fn admin(active: bool) -> Admin {
        Admin {
            id: AdminId::new("ad1").unwrap(),
            username: Username::new("ops").unwrap(),
            email: Email::new("ops@example.com").unwrap(),
            role: AdminRole::Admin,
            active,
        }
    }

    fn form(password: &str) -> LoginForm {
        LoginForm {
            email: " Ops@Example.com".to_string(),
            password: password.to_string(),
        }
    }

    fn expect_normalized_login(repo: &mut MockRepository) {
        repo.expect_login()
            .withf(|email, password| email == "ops@example.com" && password == "secret1")
            .times(1)
            .returning(|_, _| Ok(("backend-token".to_string(), admin(true))));
    }

    #[test]
    fn successful_login_opens_session() {
        let mut repo = MockRepository::new();
        expect_normalized_login(&mut repo);

        let session = login(&repo, form("secret1"), 3600).unwrap();

        assert_eq!(session.access_token, "backend-token");
        assert_eq!(session.sub, "ad1");
        assert!(!session.is_super_admin());
    }

    #[test]
    fn rejected_credentials_become_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .returning(|_, _| Err(RepositoryError::Unauthorized));

        let result = login(&repo, form("secret1"), 3600);

        assert!(matches!(result, Err(ServiceError::Form(msg)) if msg == INVALID_CREDENTIALS));
    }

    #[test]
    fn short_password_never_reaches_backend() {
        let mut repo = MockRepository::new();
        repo.expect_login().never();

        assert!(matches!(
            login(&repo, form("123"), 3600),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn disabled_account_is_refused() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .returning(|_, _| Ok(("t".to_string(), admin(false))));

        assert!(matches!(
            login(&repo, form("secret1"), 3600),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn surrounding_whitespace_in_email_is_accepted() {
        let mut repo = MockRepository::new();
        expect_normalized_login(&mut repo);

        let form = LoginForm {
            email: "ops@example.com ".to_string(),
            password: "secret1".to_string(),
        };

        assert!(login(&repo, form, 3600).is_ok());
    }

    #[test]
    fn malformed_email_never_reaches_backend() {
        let mut repo = MockRepository::new();
        repo.expect_login().never();

        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };

        assert!(matches!(
            login(&repo, form, 3600),
            Err(ServiceError::Form(msg)) if msg == INVALID_CREDENTIALS
        ));
    }
}
