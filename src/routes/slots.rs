use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::slots::SlotsQuery;
use crate::forms::slots::{BlockDayForm, BlockRangeForm, BulkSlotsForm};
use crate::models::auth::AdminSession;
use crate::repository::ApiRepository;
use crate::routes::{
    base_context, load_page, redirect, render_template, run_service, session_expired, today,
};
use crate::services::{ServiceError, slots as slots_service};

const SLOTS_PATH: &str = "/slots";

/// Calendar URL keeping the operator's date and scope selectors.
fn slots_path(date: Option<&str>, prefix: Option<&str>, astrologer_id: Option<&str>) -> String {
    let params: Vec<(&str, &str)> = [
        ("date", date),
        ("prefix", prefix),
        ("astrologer_id", astrologer_id),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|value| (key, value)))
    .collect();

    match serde_html_form::to_string(&params) {
        Ok(query) if !query.is_empty() => format!("{SLOTS_PATH}?{query}"),
        _ => SLOTS_PATH.to_string(),
    }
}

#[get("/slots")]
pub async fn show_slots(
    user: AdminSession,
    query: web::Query<SlotsQuery>,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let query = query.into_inner();
    let today = today();

    match load_page(repo, move |repo| slots_service::load_slots(repo, &query, today)).await {
        Ok((sidebar, data)) => {
            let mut context = base_context(&flash_messages, &user, "slots", &sidebar);
            context.insert("slots", &data);

            render_template(&tera, "slots/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(SLOTS_PATH)
        }
        Err(err) => {
            log::error!("Failed to load slots: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/slots/block-range")]
pub async fn block_range(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    web::Form(form): web::Form<BlockRangeForm>,
) -> impl Responder {
    let back = slots_path(
        Some(&form.date),
        form.prefix.as_deref(),
        form.astrologer_id.as_deref(),
    );
    let repo = repo.authorized(&user.access_token);

    match run_service(move || slots_service::block_range(&repo, form)).await {
        Ok(range) => {
            FlashMessage::success(format!("Blocked {} to {}.", range.start, range.end)).send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to block the time range: {err}");
            FlashMessage::error(format!("Blocking failed: {err}")).send();
            redirect(&back)
        }
    }
}

#[post("/slots/block-day")]
pub async fn block_day(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    web::Form(form): web::Form<BlockDayForm>,
) -> impl Responder {
    let back = slots_path(
        Some(&form.date),
        form.prefix.as_deref(),
        form.astrologer_id.as_deref(),
    );
    let repo = repo.authorized(&user.access_token);

    match run_service(move || slots_service::block_day(&repo, form)).await {
        Ok(range) => {
            FlashMessage::success(format!("Blocked the whole day {}.", range.date)).send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to block the day: {err}");
            FlashMessage::error(format!("Blocking failed: {err}")).send();
            redirect(&back)
        }
    }
}

/// Block or unblock every ticked row. The calendar is reloaded once after
/// the whole sweep.
#[post("/slots/bulk")]
pub async fn bulk_slots(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    form: web::Bytes,
) -> impl Responder {
    let form: BulkSlotsForm = match serde_html_form::from_bytes(&form) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Malformed bulk slot form: {err}");
            FlashMessage::error("The selection could not be read.").send();
            return redirect(SLOTS_PATH);
        }
    };
    let back = slots_path(
        Some(&form.date),
        form.prefix.as_deref(),
        form.astrologer_id.as_deref(),
    );
    let repo = repo.authorized(&user.access_token);

    match run_service(move || slots_service::bulk_update(&repo, form)).await {
        Ok(report) if report.failed() == 0 => {
            FlashMessage::success(report.summary()).send();
            redirect(&back)
        }
        Ok(report) => {
            let failures: Vec<String> = report
                .failures()
                .map(|(key, reason)| format!("{key}: {reason}"))
                .collect();
            FlashMessage::warning(format!("{}. {}", report.summary(), failures.join("; "))).send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to run the bulk slot update: {err}");
            FlashMessage::error("Bulk update failed, nothing was changed.").send();
            redirect(&back)
        }
    }
}

#[post("/slots/unblock/{slot_id}")]
pub async fn unblock_slot(
    slot_id: web::Path<String>,
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    web::Form(selectors): web::Form<SlotsQuery>,
) -> impl Responder {
    let back = slots_path(
        selectors.date.as_deref(),
        selectors.prefix.as_deref(),
        selectors.astrologer_id.as_deref(),
    );
    let repo = repo.authorized(&user.access_token);
    let slot_id = slot_id.into_inner();

    match run_service(move || slots_service::unblock(&repo, &slot_id)).await {
        Ok(()) => {
            FlashMessage::success("Slot unblocked.").send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The blocked slot no longer exists.").send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to unblock the slot: {err}");
            FlashMessage::error(format!("Unblocking failed: {err}")).send();
            redirect(&back)
        }
    }
}
