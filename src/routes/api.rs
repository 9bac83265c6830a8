use actix_web::{HttpResponse, Responder, get, web};

use crate::dto::slots::SlotsQuery;
use crate::models::auth::AdminSession;
use crate::repository::ApiRepository;
use crate::routes::{run_service, today};
use crate::services::{ServiceError, slots as slots_service};

/// Merged slot calendar as JSON, for the calendar widget.
#[get("/v1/slots")]
pub async fn api_v1_slots(
    params: web::Query<SlotsQuery>,
    user: AdminSession,
    repo: web::Data<ApiRepository>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let params = params.into_inner();
    let today = today();

    match run_service(move || slots_service::load_slots(&repo, &params, today)).await {
        Ok(data) => HttpResponse::Ok().json(data),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to list slots: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
