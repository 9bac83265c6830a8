use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::admins::{AdminPasswordForm, ChangePasswordForm, CreateAdminForm};
use crate::models::auth::AdminSession;
use crate::repository::ApiRepository;
use crate::routes::{
    base_context, forbidden, load_page, redirect, render_template, run_service, session_expired,
};
use crate::services::{ServiceError, admins as admins_service};

const ADMINS_PATH: &str = "/admins";
const ACCOUNT_PASSWORD_PATH: &str = "/account/password";

#[get("/admins")]
pub async fn show_admins(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let session = user.clone();

    match load_page(repo, move |repo| admins_service::list_admins(repo, &session)).await {
        Ok((sidebar, data)) => {
            let mut context = base_context(&flash_messages, &user, "admins", &sidebar);
            context.insert("admins", &data.admins);
            context.insert("current_admin_id", &user.sub);

            render_template(&tera, "admins/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Forbidden) => forbidden(),
        Err(err) => {
            log::error!("Failed to list admins: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admins/create")]
pub async fn create_admin(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    web::Form(form): web::Form<CreateAdminForm>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);

    match run_service(move || admins_service::create_admin(&repo, &user, form)).await {
        Ok(()) => {
            FlashMessage::success("Admin created.").send();
            redirect(ADMINS_PATH)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Forbidden) => forbidden(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(ADMINS_PATH)
        }
        Err(err) => {
            log::error!("Failed to create the admin: {err}");
            FlashMessage::error("Creating the admin failed.").send();
            redirect(ADMINS_PATH)
        }
    }
}

#[post("/admins/{admin_id}/delete")]
pub async fn delete_admin(
    admin_id: web::Path<String>,
    user: AdminSession,
    repo: web::Data<ApiRepository>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let admin_id = admin_id.into_inner();

    match run_service(move || admins_service::delete_admin(&repo, &user, &admin_id)).await {
        Ok(()) => {
            FlashMessage::success("Admin deleted.").send();
            redirect(ADMINS_PATH)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Forbidden) => forbidden(),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Admin not found.").send();
            redirect(ADMINS_PATH)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(ADMINS_PATH)
        }
        Err(err) => {
            log::error!("Failed to delete the admin: {err}");
            FlashMessage::error("Deleting the admin failed.").send();
            redirect(ADMINS_PATH)
        }
    }
}

#[post("/admins/{admin_id}/password")]
pub async fn reset_admin_password(
    admin_id: web::Path<String>,
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    web::Form(form): web::Form<AdminPasswordForm>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let admin_id = admin_id.into_inner();

    match run_service(move || {
        admins_service::reset_admin_password(&repo, &user, &admin_id, form)
    })
    .await
    {
        Ok(()) => {
            FlashMessage::success("Password changed.").send();
            redirect(ADMINS_PATH)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Forbidden) => forbidden(),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Admin not found.").send();
            redirect(ADMINS_PATH)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(ADMINS_PATH)
        }
        Err(err) => {
            log::error!("Failed to reset the admin password: {err}");
            FlashMessage::error("Changing the password failed.").send();
            redirect(ADMINS_PATH)
        }
    }
}

#[get("/account/password")]
pub async fn show_account_password(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);

    match load_page(repo, |_| Ok(())).await {
        Ok((sidebar, ())) => {
            let context = base_context(&flash_messages, &user, "account", &sidebar);
            render_template(&tera, "admins/password.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render the password page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/account/password")]
pub async fn change_account_password(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    web::Form(form): web::Form<ChangePasswordForm>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);

    match run_service(move || admins_service::change_own_password(&repo, &user, form)).await {
        Ok(()) => {
            FlashMessage::success("Your password was changed.").send();
            redirect(ACCOUNT_PASSWORD_PATH)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(ACCOUNT_PASSWORD_PATH)
        }
        Err(err) => {
            log::error!("Failed to change the password: {err}");
            FlashMessage::error("Changing the password failed.").send();
            redirect(ACCOUNT_PASSWORD_PATH)
        }
    }
}
