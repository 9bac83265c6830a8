//! Back-office for the astrology consultation platform.

pub mod batch;
pub mod date_range;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
pub mod export;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod pricing;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod selection;
#[cfg(feature = "server")]
pub mod services;
pub mod slots;
pub mod status;
pub mod wizard;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: models::config::ServerConfig) -> std::io::Result<()> {
    use std::time::Duration;

    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware as actix_middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::middleware::RedirectUnauthorized;
    use crate::repository::ApiRepository;
    use crate::routes::admins::{
        change_account_password, create_admin, delete_admin, reset_admin_password,
        show_account_password, show_admins,
    };
    use crate::routes::api::api_v1_slots;
    use crate::routes::astrologers::{save_astrologer, show_astrologer, show_astrologers};
    use crate::routes::auth::{login, logout, show_login};
    use crate::routes::main::{export_consultations, show_index};
    use crate::routes::navigation::{
        create_folder, create_route, delete_route, show_routes, update_route,
    };
    use crate::routes::pujas::{
        edit_puja, export_bookings, new_puja, reset_editor, show_bookings, step_editor, submit_editor,
    };
    use crate::routes::reports::{
        export_report_full, export_report_page, process_reports, show_automation,
        show_report_orders, update_report_order,
    };
    use crate::routes::slots::{block_day, block_range, bulk_slots, show_slots, unblock_slot};

    let repo = ApiRepository::new(
        &server_config.api_url,
        Duration::from_secs(server_config.request_timeout_secs),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build the backend client: {e}")))?;

    // Keys and stores for identity, sessions, and flash messages.
    if server_config.secret.len() < 64 {
        return Err(std::io::Error::other(
            "The secret must be at least 64 bytes long",
        ));
    }
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    let session_ttl = Duration::from_secs(server_config.session_ttl_secs.max(0) as u64);

    log::info!(
        "Starting astro-admin on {}:{} against {}",
        server_config.address,
        server_config.port,
        server_config.api_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(
                IdentityMiddleware::builder()
                    .login_deadline(Some(session_ttl))
                    .build(),
            )
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_login)
            .service(login)
            .service(web::scope("/api").service(api_v1_slots))
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(export_consultations)
                    .service(show_bookings)
                    .service(export_bookings)
                    .service(new_puja)
                    .service(step_editor)
                    .service(submit_editor)
                    .service(reset_editor)
                    .service(edit_puja)
                    .service(show_report_orders)
                    .service(export_report_page)
                    .service(export_report_full)
                    .service(update_report_order)
                    .service(show_automation)
                    .service(process_reports)
                    .service(show_slots)
                    .service(block_range)
                    .service(block_day)
                    .service(bulk_slots)
                    .service(unblock_slot)
                    .service(show_admins)
                    .service(create_admin)
                    .service(delete_admin)
                    .service(reset_admin_password)
                    .service(show_account_password)
                    .service(change_account_password)
                    .service(show_astrologers)
                    .service(show_astrologer)
                    .service(save_astrologer)
                    .service(show_routes)
                    .service(create_route)
                    .service(create_folder)
                    .service(update_route)
                    .service(delete_route)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
