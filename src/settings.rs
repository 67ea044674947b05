use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the hosted PostgREST data store.
    pub store_base_url: Url,
    /// Service key sent as `apikey` and bearer token to the store.
    pub store_api_key: String,
    pub debug: bool,
    pub auth_token: String,
    pub enable_swagger: bool,
    pub port: u16,
    pub calendar_name: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix
            .add_source(Environment::with_prefix("APP").separator("_"))
            .set_default("store_base_url", "http://localhost:54321/rest/v1")?
            .set_default("store_api_key", "")?
            .set_default("debug", false)?
            .set_default("auth_token", "default-token-change-me")?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("calendar_name", "FitDesk Trainer Schedule")?
            .build()?;

        config.try_deserialize()
    }
}
