use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::TableQuery;
use crate::models::auth::AdminSession;
use crate::models::config::ServerConfig;
use crate::repository::ApiRepository;
use crate::routes::{
    base_context, csv_response, load_page, preset_options, redirect, render_template, run_service,
    session_expired, status_options, today,
};
use crate::services::{ServiceError, consultations as consultations_service};
use crate::status::ConsultationStatus;

#[get("/")]
pub async fn show_index(
    user: AdminSession,
    query: web::Query<TableQuery>,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let query = query.into_inner();
    let per_page = server_config.default_page_size;
    let today = today();

    match load_page(repo, move |repo| {
        consultations_service::load_consultations(repo, &query, today, per_page)
    })
    .await
    {
        Ok((sidebar, data)) => {
            let mut context = base_context(&flash_messages, &user, "consultations", &sidebar);
            context.insert("logs", &data.logs);
            context.insert("counts", &data.counts);
            context.insert("filters", &data.filters);
            context.insert("presets", &preset_options());
            context.insert("statuses", &status_options::<ConsultationStatus>());

            render_template(&tera, "main/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load consultation logs: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/consultations/export")]
pub async fn export_consultations(
    user: AdminSession,
    query: web::Query<TableQuery>,
    repo: web::Data<ApiRepository>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let query = query.into_inner();
    let today = today();

    match run_service(move || consultations_service::export_consultations(&repo, &query, today)).await
    {
        Ok(download) => csv_response(download),
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to export consultation logs: {err}");
            FlashMessage::error("Export failed, please try again.").send();
            redirect("/")
        }
    }
}
