use serde::Deserialize;
use validator::Validate;

use crate::domain::admin::{AdminRole, NewAdmin, PasswordChange};
use crate::domain::types::{Email, Password, Username};
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Form data for creating an admin account.
pub struct CreateAdminForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub role: String,
}

impl TryFrom<CreateAdminForm> for NewAdmin {
    type Error = FormError;

    fn try_from(form: CreateAdminForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewAdmin {
            username: Username::new(form.username)?,
            email: Email::new(form.email)?,
            password: Password::new(form.password)?,
            role: AdminRole::try_from(form.role.as_str()).map_err(FormError::Invalid)?,
        })
    }
}

fn confirmed(password: String, confirmation: &str) -> Result<Password, FormError> {
    if password != confirmation {
        return Err(FormError::PasswordMismatch);
    }
    Ok(Password::new(password)?)
}

#[derive(Deserialize)]
/// Form data for changing the signed-in admin's own password.
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl TryFrom<ChangePasswordForm> for PasswordChange {
    type Error = FormError;

    fn try_from(form: ChangePasswordForm) -> Result<Self, Self::Error> {
        if form.current_password.is_empty() {
            return Err(FormError::Invalid("Current password is required".to_string()));
        }
        Ok(PasswordChange {
            new: confirmed(form.new_password, &form.confirm_password)?,
            current: form.current_password,
        })
    }
}

#[derive(Deserialize)]
/// Form data for resetting another admin's password.
pub struct AdminPasswordForm {
    pub new_password: String,
    pub confirm_password: String,
}

impl TryFrom<AdminPasswordForm> for Password {
    type Error = FormError;

    fn try_from(form: AdminPasswordForm) -> Result<Self, Self::Error> {
        confirmed(form.new_password, &form.confirm_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_admin_form_converts() {
        let form = CreateAdminForm {
            username: " ops ".to_string(),
            email: "Ops@Example.com".to_string(),
            password: "secret1".to_string(),
            role: "ADMIN".to_string(),
        };

        let admin = NewAdmin::try_from(form).unwrap();

        assert_eq!(admin.username.as_str(), "ops");
        assert_eq!(admin.email.as_str(), "ops@example.com");
        assert_eq!(admin.role, AdminRole::Admin);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let form = CreateAdminForm {
            username: "ops".to_string(),
            email: "ops@example.com".to_string(),
            password: "secret1".to_string(),
            role: "ROOT".to_string(),
        };
        assert!(matches!(NewAdmin::try_from(form), Err(FormError::Invalid(_))));
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let form = ChangePasswordForm {
            current_password: "old-secret".to_string(),
            new_password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        };
        assert!(matches!(
            PasswordChange::try_from(form),
            Err(FormError::PasswordMismatch)
        ));
    }

    #[test]
    fn short_reset_password_is_rejected() {
        let form = AdminPasswordForm {
            new_password: "abc".to_string(),
            confirm_password: "abc".to_string(),
        };
        assert!(matches!(
            Password::try_from(form),
            Err(FormError::PasswordTooShort)
        ));
    }
}
