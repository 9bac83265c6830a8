//! Configuration model loaded from external sources.

use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_session_ttl_secs() -> i64 {
    8 * 60 * 60
}

fn default_page_size() -> usize {
    20
}

/// Platform-wide first-time price for a consultation length.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct FirstTimeOffer {
    pub duration_minutes: u32,
    pub price: u32,
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    /// Base URL of the platform REST backend.
    pub api_url: String,
    pub templates_dir: String,
    pub secret: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default)]
    pub first_time_offer: Vec<FirstTimeOffer>,
}

impl ServerConfig {
    /// Platform first-time offers keyed by duration minutes.
    pub fn platform_offers(&self) -> BTreeMap<u32, u32> {
        self.first_time_offer
            .iter()
            .map(|offer| (offer.duration_minutes, offer.price))
            .collect()
    }
}

/// Reads `{dir}/default.yaml`, the optional `{dir}/{app_env}.yaml` and `APP_*`
/// environment overrides, in that order.
pub fn load_server_config(dir: &Path, app_env: &str) -> Result<ServerConfig, ConfigError> {
    let default = dir.join("default");
    let profile = dir.join(app_env);

    let settings = Config::builder()
        // `default.yaml`
        .add_source(File::with_name(&default.to_string_lossy()))
        // environment-specific overrides
        .add_source(File::with_name(&profile.to_string_lossy()).required(false))
        // settings from the environment (with a prefix of APP)
        .add_source(Environment::with_prefix("APP"))
        .build()?;

    settings.try_deserialize::<ServerConfig>()
}
