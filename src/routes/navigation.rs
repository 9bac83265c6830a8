use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::navigation::{CreateFolderForm, CreateRouteForm, UpdateRouteForm};
use crate::models::auth::AdminSession;
use crate::repository::ApiRepository;
use crate::routes::{
    base_context, forbidden, load_page, redirect, render_template, run_service, session_expired,
};
use crate::services::{ServiceError, ServiceResult, navigation as navigation_service};

const ROUTES_PATH: &str = "/routes";

#[get("/routes")]
pub async fn show_routes(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let session = user.clone();

    match load_page(repo, move |repo| navigation_service::list_routes(repo, &session)).await {
        Ok((sidebar, data)) => {
            let mut context = base_context(&flash_messages, &user, "routes", &sidebar);
            context.insert("rows", &data.rows);
            context.insert("folders", &data.folders);
            context.insert("admins", &data.admins);

            render_template(&tera, "navigation/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Forbidden) => forbidden(),
        Err(err) => {
            log::error!("Failed to list routes: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Flash and redirect shared by the route mutations.
fn mutation_response(result: ServiceResult<()>, success: &str, action: &str) -> HttpResponse {
    match result {
        Ok(()) => {
            FlashMessage::success(success).send();
            redirect(ROUTES_PATH)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Forbidden) => forbidden(),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Route not found.").send();
            redirect(ROUTES_PATH)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(ROUTES_PATH)
        }
        Err(err) => {
            log::error!("Failed to {action}: {err}");
            FlashMessage::error(format!("Could not {action}.")).send();
            redirect(ROUTES_PATH)
        }
    }
}

fn parse_form<T: serde::de::DeserializeOwned>(form: &[u8]) -> Result<T, HttpResponse> {
    serde_html_form::from_bytes(form).map_err(|err| {
        log::warn!("Malformed route form: {err}");
        FlashMessage::error("The route form could not be read.").send();
        redirect(ROUTES_PATH)
    })
}

#[post("/routes/create")]
pub async fn create_route(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    form: web::Bytes,
) -> impl Responder {
    let form: CreateRouteForm = match parse_form(&form) {
        Ok(form) => form,
        Err(response) => return response,
    };
    let repo = repo.authorized(&user.access_token);

    let result = run_service(move || navigation_service::create_route(&repo, &user, form)).await;
    mutation_response(result, "Route created.", "create the route")
}

#[post("/routes/folder")]
pub async fn create_folder(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    web::Form(form): web::Form<CreateFolderForm>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);

    let result = run_service(move || navigation_service::create_folder(&repo, &user, form)).await;
    mutation_response(result, "Folder created.", "create the folder")
}

#[post("/routes/{route_id}")]
pub async fn update_route(
    route_id: web::Path<String>,
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    form: web::Bytes,
) -> impl Responder {
    let form: UpdateRouteForm = match parse_form(&form) {
        Ok(form) => form,
        Err(response) => return response,
    };
    let repo = repo.authorized(&user.access_token);
    let route_id = route_id.into_inner();

    let result = run_service(move || {
        navigation_service::update_route(&repo, &user, &route_id, form)
    })
    .await;
    mutation_response(result, "Route updated.", "update the route")
}

#[post("/routes/{route_id}/delete")]
pub async fn delete_route(
    route_id: web::Path<String>,
    user: AdminSession,
    repo: web::Data<ApiRepository>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let route_id = route_id.into_inner();

    let result =
        run_service(move || navigation_service::delete_route(&repo, &user, &route_id)).await;
    mutation_response(result, "Route deleted.", "delete the route")
}
