use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::dto::TableQuery;
use crate::dto::pujas::{EditorPageData, SubmitOutcome};
use crate::forms::optional_text;
use crate::forms::puja::PujaEditorForm;
use crate::models::auth::AdminSession;
use crate::models::config::ServerConfig;
use crate::repository::ApiRepository;
use crate::routes::{
    base_context, csv_response, load_page, preset_options, redirect, render_template, run_service,
    session_expired, status_options, today,
};
use crate::services::{ServiceError, editor as editor_service, pujas as pujas_service};
use crate::status::PaymentStatus;

const BOOKINGS_PATH: &str = "/pujas/bookings";
const EDITOR_PATH: &str = "/pujas/editor";

#[get("/pujas/bookings")]
pub async fn show_bookings(
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
        pujas_service::load_bookings(repo, &query, today, per_page)
    })
    .await
    {
        Ok((sidebar, data)) => {
            let mut context = base_context(&flash_messages, &user, "puja_bookings", &sidebar);
            context.insert("bookings", &data.bookings);
            context.insert("counts", &data.counts);
            context.insert("filters", &data.filters);
            context.insert("presets", &preset_options());
            context.insert("statuses", &status_options::<PaymentStatus>());

            render_template(&tera, "pujas/bookings.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(BOOKINGS_PATH)
        }
        Err(err) => {
            log::error!("Failed to load puja bookings: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/pujas/bookings/export")]
pub async fn export_bookings(
    user: AdminSession,
    query: web::Query<TableQuery>,
    repo: web::Data<ApiRepository>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let query = query.into_inner();
    let today = today();

    match run_service(move || pujas_service::export_bookings(&repo, &query, today)).await {
        Ok(download) => csv_response(download),
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(BOOKINGS_PATH)
        }
        Err(err) => {
            log::error!("Failed to export puja bookings: {err}");
            FlashMessage::error("Export failed, please try again.").send();
            redirect(BOOKINGS_PATH)
        }
    }
}

fn render_editor(tera: &Tera, mut context: Context, data: &EditorPageData) -> HttpResponse {
    context.insert("editor", &data.editor);
    context.insert("tabs", &data.tabs);
    render_template(tera, "pujas/editor.html", &context)
}

async fn show_editor(
    user: AdminSession,
    puja_id: Option<String>,
    repo: &ApiRepository,
    flash_messages: IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    let repo = repo.authorized(&user.access_token);

    match load_page(repo, move |repo| {
        editor_service::open_editor(repo, puja_id.as_deref())
    })
    .await
    {
        Ok((sidebar, data)) => {
            let context = base_context(&flash_messages, &user, "puja_editor", &sidebar);
            render_editor(tera, context, &data)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Puja not found.").send();
            redirect(EDITOR_PATH)
        }
        Err(err) => {
            log::error!("Failed to open the puja editor: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/pujas/editor")]
pub async fn new_puja(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    show_editor(user, None, &repo, flash_messages, &tera).await
}

#[get("/pujas/editor/{puja_id}")]
pub async fn edit_puja(
    puja_id: web::Path<String>,
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    show_editor(user, Some(puja_id.into_inner()), &repo, flash_messages, &tera).await
}

fn parse_editor_form(form: &[u8]) -> Result<PujaEditorForm, HttpResponse> {
    serde_html_form::from_bytes(form).map_err(|err| {
        log::warn!("Malformed puja editor form: {err}");
        FlashMessage::error("The editor form could not be read.").send();
        redirect(EDITOR_PATH)
    })
}

fn editor_path(id: Option<&str>) -> String {
    match optional_text(id) {
        Some(id) => format!("{EDITOR_PATH}/{id}"),
        None => EDITOR_PATH.to_string(),
    }
}

/// Moves between tabs or adds/removes list rows; nothing is saved.
#[post("/pujas/editor/step")]
pub async fn step_editor(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    form: web::Bytes,
) -> impl Responder {
    let form = match parse_editor_form(&form) {
        Ok(form) => form,
        Err(response) => return response,
    };
    let repo = repo.authorized(&user.access_token);

    match load_page(repo, move |_| editor_service::step_editor(form)).await {
        Ok((sidebar, data)) => {
            let context = base_context(&flash_messages, &user, "puja_editor", &sidebar);
            render_editor(&tera, context, &data)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(EDITOR_PATH)
        }
        Err(err) => {
            log::error!("Failed to apply the editor action: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/pujas/editor/submit")]
pub async fn submit_editor(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    form: web::Bytes,
) -> impl Responder {
    let form = match parse_editor_form(&form) {
        Ok(form) => form,
        Err(response) => return response,
    };
    let back = editor_path(form.id.as_deref());
    let repo = repo.authorized(&user.access_token);

    match load_page(repo, move |repo| editor_service::submit_editor(repo, form)).await {
        Ok((_, SubmitOutcome::Created)) => {
            FlashMessage::success("Puja created.").send();
            redirect(EDITOR_PATH)
        }
        Ok((_, SubmitOutcome::Updated)) => {
            FlashMessage::success("Puja updated.").send();
            redirect(&back)
        }
        Ok((sidebar, SubmitOutcome::Invalid(data))) => {
            let mut context = base_context(&flash_messages, &user, "puja_editor", &sidebar);
            context.insert("form_error", "Some tabs need attention before saving.");
            render_editor(&tera, context, &data)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to save the puja: {err}");
            FlashMessage::error("Saving the puja failed, please try again.").send();
            redirect(&back)
        }
    }
}

/// Drops the unsaved draft and reopens the editor from the stored puja.
#[post("/pujas/editor/reset")]
pub async fn reset_editor(_user: AdminSession, form: web::Bytes) -> impl Responder {
    let form = match parse_editor_form(&form) {
        Ok(form) => form,
        Err(response) => return response,
    };
    FlashMessage::info("Unsaved changes were discarded.").send();
    redirect(&editor_path(form.id.as_deref()))
}
