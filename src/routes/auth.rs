use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::auth::LoginForm;
use crate::models::config::ServerConfig;
use crate::repository::ApiRepository;
use crate::routes::{LOGIN_PATH, alerts_context, redirect, render_template, run_service};
use crate::services::{ServiceError, auth as auth_service};

#[get("/login")]
pub async fn show_login(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = alerts_context(&flash_messages);
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    request: HttpRequest,
    repo: web::Data<ApiRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let ttl_secs = server_config.session_ttl_secs;

    match run_service(move || auth_service::login(&repo, form, ttl_secs)).await {
        Ok(session) => {
            let token = match session.to_jwt(&server_config.secret) {
                Ok(token) => token,
                Err(err) => {
                    log::error!("Failed to encode session token: {err}");
                    return HttpResponse::InternalServerError().finish();
                }
            };
            if let Err(err) = Identity::login(&request.extensions(), token) {
                log::error!("Failed to attach identity: {err}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success(format!("Welcome back, {}.", session.username)).send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(LOGIN_PATH)
        }
        Err(err) => {
            log::error!("Failed to sign in: {err}");
            FlashMessage::error("Sign-in is unavailable, please try again later.").send();
            redirect(LOGIN_PATH)
        }
    }
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect(LOGIN_PATH)
}
