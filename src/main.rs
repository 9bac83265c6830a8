use std::path::Path;

use astro_admin::models::config::load_server_config;
use astro_admin::run;
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let server_config = match load_server_config(Path::new("config"), &app_env) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    run(server_config).await
}
