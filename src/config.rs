// config.rs
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub port: u16,
    // Backend REST API consumed by the workflows
    pub backend_api_url: String,
    pub backend_api_token: Option<String>,
    pub http_timeout: Duration,
    pub escrow_poll_interval: Duration,
    // Email service configurations
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let app_url = required("APP_URL")?;
        let port = parsed("PORT", 8000)?;

        let backend_api_url = std::env::var("BACKEND_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let backend_api_token = std::env::var("BACKEND_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());
        let http_timeout = Duration::from_secs(parsed("HTTP_TIMEOUT_SECS", 30)?);
        let escrow_poll_interval = Duration::from_secs(parsed("ESCROW_POLL_SECS", 60)?);

        // Email service configurations (with defaults)
        let smtp_host = std::env::var("SMTP_HOST")
            .unwrap_or_else(|_| "localhost".to_string());
        let smtp_port = parsed("SMTP_PORT", 587)?;
        let smtp_username = std::env::var("SMTP_USERNAME")
            .unwrap_or_else(|_| "".to_string());
        let smtp_password = std::env::var("SMTP_PASSWORD")
            .unwrap_or_else(|_| "".to_string());
        let from_email = std::env::var("FROM_EMAIL")
            .unwrap_or_else(|_| "iAyos <noreply@iayos.online>".to_string());

        Ok(Config {
            database_url,
            app_url: app_url.trim_end_matches('/').to_string(),
            port,
            backend_api_url: backend_api_url.trim_end_matches('/').to_string(),
            backend_api_token,
            http_timeout,
            escrow_poll_interval,
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_email,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
