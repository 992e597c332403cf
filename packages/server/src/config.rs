use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub dataforseo_login: String,
    pub dataforseo_password: String,
    pub dataforseo_base_url: Option<String>,
    /// Root directory of the raw store (`raw/in/...` lives below it)
    pub raw_store_root: PathBuf,
    pub connector_name: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            dataforseo_login: env::var("DATAFORSEO_LOGIN")
                .context("DATAFORSEO_LOGIN must be set")?,
            dataforseo_password: env::var("DATAFORSEO_PASSWORD")
                .context("DATAFORSEO_PASSWORD must be set")?,
            dataforseo_base_url: env::var("DATAFORSEO_BASE_URL").ok(),
            raw_store_root: env::var("RAW_STORE_ROOT")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),
            connector_name: env::var("CONNECTOR_NAME")
                .unwrap_or_else(|_| crate::kernel::DEFAULT_CONNECTOR_NAME.to_string()),
        })
    }
}
