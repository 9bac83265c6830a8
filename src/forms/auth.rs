use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
/// Credentials submitted on the sign-in page.
///
/// The email is normalized and checked by [`crate::domain::types::Email`].
pub struct LoginForm {
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}
