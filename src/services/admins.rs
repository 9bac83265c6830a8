//! Admin account management and password changes.

use crate::domain::admin::{NewAdmin, PasswordChange};
use crate::domain::types::{AdminId, Password};
use crate::dto::admins::AdminsPageData;
use crate::forms::admins::{AdminPasswordForm, ChangePasswordForm, CreateAdminForm};
use crate::models::auth::AdminSession;
use crate::repository::errors::RepositoryError;
use crate::repository::{AdminReader, AdminWriter};
use crate::services::{ServiceError, ServiceResult, ensure_super_admin};

/// Lists every admin account. Super admins only.
pub fn list_admins<R>(repo: &R, user: &AdminSession) -> ServiceResult<AdminsPageData>
where
    R: AdminReader + ?Sized,
{
    ensure_super_admin(user)?;

    let mut admins = repo.list_admins().map_err(|err| {
        log::error!("Failed to list admins: {err}");
        err
    })?;
    admins.sort_by(|a, b| a.username.as_str().cmp(b.username.as_str()));

    Ok(AdminsPageData { admins })
}

pub fn create_admin<R>(repo: &R, user: &AdminSession, form: CreateAdminForm) -> ServiceResult<()>
where
    R: AdminWriter + ?Sized,
{
    ensure_super_admin(user)?;
    let admin = NewAdmin::try_from(form)?;

    repo.create_admin(&admin).map_err(|err| match err {
        RepositoryError::Api {
            status: 400 | 409,
            message,
        } => ServiceError::Form(message),
        other => {
            log::error!("Failed to create admin {}: {other}", admin.email);
            ServiceError::from(other)
        }
    })?;

    log::info!("Admin {} created by {}", admin.email, user.email);
    Ok(())
}

/// Deletes another admin's account. Removing your own account is refused.
pub fn delete_admin<R>(repo: &R, user: &AdminSession, admin_id: &str) -> ServiceResult<()>
where
    R: AdminWriter + ?Sized,
{
    ensure_super_admin(user)?;
    let id = AdminId::new(admin_id)?;
    if id.as_str() == user.sub {
        return Err(ServiceError::Form(
            "You cannot delete your own account".to_string(),
        ));
    }

    repo.delete_admin(&id).map_err(|err| {
        log::error!("Failed to delete admin {id}: {err}");
        err
    })?;

    log::info!("Admin {id} deleted by {}", user.email);
    Ok(())
}

/// Sets a new password on another admin's account.
pub fn reset_admin_password<R>(
    repo: &R,
    user: &AdminSession,
    admin_id: &str,
    form: AdminPasswordForm,
) -> ServiceResult<()>
where
    R: AdminWriter + ?Sized,
{
    ensure_super_admin(user)?;
    let id = AdminId::new(admin_id)?;
    let password = Password::try_from(form)?;

    repo.change_admin_password(&id, &password).map_err(|err| {
        log::error!("Failed to reset password of admin {id}: {err}");
        err
    })?;

    log::info!("Password of admin {id} reset by {}", user.email);
    Ok(())
}

/// Changes the signed-in admin's own password.
pub fn change_own_password<R>(repo: &R, user: &AdminSession, form: ChangePasswordForm) -> ServiceResult<()>
where
    R: AdminWriter + ?Sized,
{
    let change = PasswordChange::try_from(form)?;

    repo.change_password(&change).map_err(|err| match err {
        RepositoryError::Api { status: 400, .. } => {
            log::warn!("Admin {} entered a wrong current password", user.email);
            ServiceError::Form("Current password is incorrect".to_string())
        }
        other => {
            log::error!("Failed to change password of {}: {other}", user.email);
            ServiceError::from(other)
        }
    })?;

    log::info!("Admin {} changed their password", user.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::admin::{Admin, AdminRole};
    use crate::domain::types::{Email, Username};
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::session;

    fn admin(id: &str, username: &str) -> Admin {
        Admin {
            id: AdminId::new(id).unwrap(),
            username: Username::new(username).unwrap(),
            email: Email::new(format!("{username}@example.com")).unwrap(),
            role: AdminRole::Admin,
            active: true,
        }
    }

    #[test]
    fn plain_admins_cannot_list_accounts() {
        let mut repo = MockRepository::new();
        repo.expect_list_admins().never();

        assert!(matches!(
            list_admins(&repo, &session(AdminRole::Admin)),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn accounts_are_sorted_by_username() {
        let mut repo = MockRepository::new();
        repo.expect_list_admins()
            .returning(|| Ok(vec![admin("ad3", "zed"), admin("ad2", "amy")]));

        let data = list_admins(&repo, &session(AdminRole::SuperAdmin)).unwrap();

        let names: Vec<&str> = data.admins.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, vec!["amy", "zed"]);
    }

    #[test]
    fn own_account_cannot_be_deleted() {
        let mut repo = MockRepository::new();
        repo.expect_delete_admin().never();

        let result = delete_admin(&repo, &session(AdminRole::SuperAdmin), "ad1");

        assert!(matches!(result, Err(ServiceError::Form(msg)) if msg.contains("own account")));
    }

    #[test]
    fn other_account_is_deleted() {
        let mut repo = MockRepository::new();
        repo.expect_delete_admin()
            .withf(|id| id.as_str() == "ad2")
            .times(1)
            .returning(|_| Ok(()));

        assert!(delete_admin(&repo, &session(AdminRole::SuperAdmin), "ad2").is_ok());
    }

    #[test]
    fn duplicate_email_is_reported_to_operator() {
        let mut repo = MockRepository::new();
        repo.expect_create_admin().returning(|_| {
            Err(RepositoryError::Api {
                status: 409,
                message: "Email already in use".to_string(),
            })
        });
        let form = CreateAdminForm {
            username: "new".to_string(),
            email: "new@example.com".to_string(),
            password: "secret1".to_string(),
            role: "ADMIN".to_string(),
        };

        let result = create_admin(&repo, &session(AdminRole::SuperAdmin), form);

        assert!(matches!(result, Err(ServiceError::Form(msg)) if msg == "Email already in use"));
    }

    #[test]
    fn mismatched_confirmation_never_reaches_backend() {
        let mut repo = MockRepository::new();
        repo.expect_change_password().never();
        let form = ChangePasswordForm {
            current_password: "old-secret".to_string(),
            new_password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        };

        assert!(matches!(
            change_own_password(&repo, &session(AdminRole::Admin), form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn wrong_current_password_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_change_password().returning(|_| {
            Err(RepositoryError::Api {
                status: 400,
                message: "Invalid current password".to_string(),
            })
        });
        let form = ChangePasswordForm {
            current_password: "old-secret".to_string(),
            new_password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        };

        let result = change_own_password(&repo, &session(AdminRole::Admin), form);

        assert!(matches!(result, Err(ServiceError::Form(msg)) if msg.contains("incorrect")));
    }
}
