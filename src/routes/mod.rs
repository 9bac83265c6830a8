//! HTTP handlers and the helpers they share.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tera::{Context, Tera};

use crate::date_range::DateRangePreset;
use crate::domain::route::SidebarRoute;
use crate::models::auth::AdminSession;
use crate::repository::ApiRepository;
use crate::services::sidebar::load_sidebar;
use crate::services::{CsvDownload, ServiceError, ServiceResult};
use crate::status::StatusKind;

pub mod admins;
pub mod api;
pub mod astrologers;
pub mod auth;
pub mod main;
pub mod navigation;
pub mod pujas;
pub mod reports;
pub mod slots;

pub const LOGIN_PATH: &str = "/login";

#[derive(Serialize)]
struct Alert<'a> {
    message: &'a str,
    level: &'static str,
}

/// Bootstrap alert class for a flash level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context with only the pending flash alerts, for pages shown signed out.
pub fn alerts_context(flash_messages: &IncomingFlashMessages) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            message: message.content(),
            level: alert_level_to_str(&message.level()),
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context
}

/// Context shared by every signed-in page.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AdminSession,
    current_page: &str,
    sidebar: &[SidebarRoute],
) -> Context {
    let mut context = alerts_context(flash_messages);
    context.insert("current_user", &user.current_user());
    context.insert("current_page", current_page);
    context.insert("sidebar", sidebar);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err:?}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn csv_response(download: CsvDownload) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download.filename),
        ))
        .body(download.body)
}

/// Local calendar date used to resolve date presets.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Runs a service on the blocking pool; the backend client is synchronous.
pub async fn run_service<T, F>(f: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|err| ServiceError::Internal(err.to_string()))?
}

/// Runs a page service and loads the sidebar in the same blocking call.
pub async fn load_page<T, F>(repo: ApiRepository, f: F) -> ServiceResult<(Vec<SidebarRoute>, T)>
where
    F: FnOnce(&ApiRepository) -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    run_service(move || {
        let data = f(&repo)?;
        Ok((load_sidebar(&repo), data))
    })
    .await
}

/// The backend no longer accepts the operator's token.
pub fn session_expired() -> HttpResponse {
    FlashMessage::warning("Your session has expired, please sign in again.").send();
    redirect(LOGIN_PATH)
}

pub fn forbidden() -> HttpResponse {
    FlashMessage::error("Insufficient permissions.").send();
    redirect("/")
}

/// One `<option>` of a toolbar select.
#[derive(Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Choices of the date range selector.
pub fn preset_options() -> Vec<SelectOption> {
    DateRangePreset::ALL
        .into_iter()
        .map(|preset| SelectOption {
            value: preset.as_str(),
            label: preset.label(),
        })
        .collect()
}

/// Choices of a status filter, `all` first.
pub fn status_options<S: StatusKind>() -> Vec<SelectOption> {
    std::iter::once(SelectOption {
        value: "all",
        label: "All",
    })
    .chain(S::ALL.iter().map(|status| SelectOption {
        value: status.as_str(),
        label: status.label(),
    }))
    .collect()
}
