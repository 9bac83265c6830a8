use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::TableQuery;
use crate::dto::reports::AutomationQuery;
use crate::forms::reports::{ProcessReportsForm, UpdateReportOrderForm};
use crate::models::auth::AdminSession;
use crate::models::config::ServerConfig;
use crate::repository::ApiRepository;
use crate::routes::{
    base_context, csv_response, load_page, preset_options, redirect, render_template, run_service,
    session_expired, status_options, today,
};
use crate::services::{ServiceError, automation as automation_service, reports as reports_service};
use crate::status::{DeliveryStatus, ReportStatus};

const ORDERS_PATH: &str = "/reports/orders";
const AUTOMATION_PATH: &str = "/reports/automation";

#[get("/reports/orders")]
pub async fn show_report_orders(
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
        reports_service::load_report_orders(repo, &query, today, per_page)
    })
    .await
    {
        Ok((sidebar, data)) => {
            let mut context = base_context(&flash_messages, &user, "report_orders", &sidebar);
            context.insert("orders", &data.orders);
            context.insert("counts", &data.counts);
            context.insert("filters", &data.filters);
            context.insert("presets", &preset_options());
            context.insert("statuses", &status_options::<ReportStatus>());
            context.insert("delivery_statuses", &status_options::<DeliveryStatus>());

            render_template(&tera, "reports/orders.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(ORDERS_PATH)
        }
        Err(err) => {
            log::error!("Failed to load report orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/reports/orders/{order_id}")]
pub async fn update_report_order(
    order_id: web::Path<String>,
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    web::Form(form): web::Form<UpdateReportOrderForm>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let order_id = order_id.into_inner();

    match run_service(move || reports_service::update_report_order(&repo, &order_id, form)).await {
        Ok(()) => {
            FlashMessage::success("Order updated.").send();
            redirect(ORDERS_PATH)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Order not found.").send();
            redirect(ORDERS_PATH)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(ORDERS_PATH)
        }
        Err(err) => {
            log::error!("Failed to update the report order: {err}");
            FlashMessage::error("Updating the order failed.").send();
            redirect(ORDERS_PATH)
        }
    }
}

#[get("/reports/orders/export")]
pub async fn export_report_page(
    user: AdminSession,
    query: web::Query<TableQuery>,
    repo: web::Data<ApiRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let query = query.into_inner();
    let per_page = server_config.default_page_size;
    let today = today();

    match run_service(move || {
        reports_service::export_report_page(&repo, &query, today, per_page)
    })
    .await
    {
        Ok(download) => csv_response(download),
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(err) => {
            log::error!("Failed to export report orders: {err}");
            FlashMessage::error("Export failed, please try again.").send();
            redirect(ORDERS_PATH)
        }
    }
}

#[get("/reports/orders/export/full")]
pub async fn export_report_full(
    user: AdminSession,
    query: web::Query<TableQuery>,
    repo: web::Data<ApiRepository>,
) -> impl Responder {
    let repo = repo.authorized(&user.access_token);
    let query = query.into_inner();
    let today = today();

    match run_service(move || reports_service::export_report_orders_full(&repo, &query, today)).await
    {
        Ok(download) => csv_response(download),
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(err) => {
            log::error!("Failed to export all report orders: {err}");
            FlashMessage::error("Export failed, please try again.").send();
            redirect(ORDERS_PATH)
        }
    }
}

#[get("/reports/automation")]
pub async fn show_automation(
    user: AdminSession,
    query: web::Query<AutomationQuery>,
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
        automation_service::load_automation(repo, &query, today, per_page)
    })
    .await
    {
        Ok((sidebar, data)) => {
            let mut context = base_context(&flash_messages, &user, "report_automation", &sidebar);
            context.insert("orders", &data.orders);
            context.insert("selected", &data.selected);
            context.insert("select_count", &data.select_count);
            context.insert("undelivered", &data.undelivered);
            context.insert("counts", &data.counts);
            context.insert("filters", &data.filters);
            context.insert("presets", &preset_options());
            context.insert("statuses", &status_options::<ReportStatus>());

            render_template(&tera, "reports/automation.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(AUTOMATION_PATH)
        }
        Err(err) => {
            log::error!("Failed to load pending reports: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/reports/automation/process")]
pub async fn process_reports(
    user: AdminSession,
    repo: web::Data<ApiRepository>,
    form: web::Bytes,
) -> impl Responder {
    let form: ProcessReportsForm = match serde_html_form::from_bytes(&form) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Malformed processing form: {err}");
            FlashMessage::error("The selection could not be read.").send();
            return redirect(AUTOMATION_PATH);
        }
    };
    let repo = repo.authorized(&user.access_token);

    match run_service(move || automation_service::process_selected(&repo, form)).await {
        Ok(summary) if summary.failed == 0 => {
            FlashMessage::success(format!("{} report(s) sent for processing.", summary.processed))
                .send();
            redirect(AUTOMATION_PATH)
        }
        Ok(summary) => {
            FlashMessage::warning(format!(
                "{} report(s) sent for processing, {} failed.",
                summary.processed, summary.failed
            ))
            .send();
            redirect(AUTOMATION_PATH)
        }
        Err(ServiceError::Unauthorized) => session_expired(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(AUTOMATION_PATH)
        }
        Err(err) => {
            log::error!("Failed to process reports: {err}");
            FlashMessage::error("Report processing failed.").send();
            redirect(AUTOMATION_PATH)
        }
    }
}
