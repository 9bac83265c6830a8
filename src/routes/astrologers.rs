use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::astrologers::AstrologersQuery;
use crate::forms::astrologers::UpdateAstrologerForm;
use crate::models::auth::AdminSession;
use crate::models::config::ServerConfig;
use crate::repository::ApiRepository;
use crate::routes::{
    base_context, load_page, redirect, render_template, run_service, session_expired,
};
use crate::services::{ServiceError, astrologers as astrologers_service};

const ASTROLOGERS_PATH: &str = "/astrologers";

#[get("/astrologers")]
pub async fn show_astrologers(
    user: AdminSession,
    query: web::Query<AstrologersQuery>,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let query = query.into_inner();
    let per_page = server_config.default_page_size;

    match load_page(repo, move |repo| {
        astrologers_service::list_astrologers(repo, &query, per_page)
    })
    .await
    {
        Ok((sidebar, data)) => {
            let mut context = base_context(&flash_messages, &user, "astrologers", &sidebar);
            context.insert("astrologers", &data.astrologers);
            context.insert("search", &data.search);

            render_template(&tera, "astrologers/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(err) => {
            log::error!("Failed to list astrologers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/astrologers/{astrologer_id}")]
pub async fn show_astrologer(
    astrologer_id: web::Path<String>,
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let astrologer_id = astrologer_id.into_inner();
    let platform_offers = server_config.platform_offers();

    match load_page(repo, move |repo| {
        astrologers_service::load_astrologer(repo, &astrologer_id, &platform_offers)
    })
    .await
    {
        Ok((sidebar, data)) => {
            let mut context = base_context(&flash_messages, &user, "astrologers", &sidebar);
            context.insert("astrologer", &data.astrologer);
            context.insert("prices", &data.prices);

            render_template(&tera, "astrologers/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Astrologer not found.").send();
            redirect(ASTROLOGERS_PATH)
        }
        Err(err) => {
            log::error!("Failed to load the astrologer: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/astrologers/{astrologer_id}")]
pub async fn save_astrologer(
    astrologer_id: web::Path<String>,
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    form: web::Bytes,
) -> impl Responder {
    let astrologer_id = astrologer_id.into_inner();
    let back = format!("{ASTROLOGERS_PATH}/{astrologer_id}");
    let form: UpdateAstrologerForm = match serde_html_form::from_bytes(&form) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Malformed astrologer form: {err}");
            FlashMessage::error("The profile form could not be read.").send();
            return redirect(&back);
        }
    };
    let repo = repo.authorized(&user.access_token);

    match run_service(move || {
        astrologers_service::update_astrologer(&repo, &astrologer_id, form)
    })
    .await
    {
        Ok(()) => {
            FlashMessage::success("Astrologer profile saved.").send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to save the astrologer: {err}");
            FlashMessage::error("Saving the profile failed.").send();
            redirect(&back)
        }
    }
}
