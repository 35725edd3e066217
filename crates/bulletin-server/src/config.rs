use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Placeholder secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "yandexlyceum_secret_key",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BULLETIN_SECRET_KEY is unset or still a placeholder")]
    MissingSecret,

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub secret_key: String,
    pub db_path: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret_key = get("BULLETIN_SECRET_KEY").unwrap_or_default();
        if secret_key.is_empty() || PLACEHOLDER_SECRETS.contains(&secret_key.as_str()) {
            return Err(ConfigError::MissingSecret);
        }

        let db_path = get("BULLETIN_DB_PATH").unwrap_or_else(|| "bulletin.db".into()).into();
        let host = get("BULLETIN_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("BULLETIN_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                field: "BULLETIN_PORT",
                reason: e.to_string(),
            })?;
        let addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                field: "BULLETIN_HOST",
                reason: e.to_string(),
            })?;

        Ok(Self {
            secret_key,
            db_path,
            addr,
        })
    }
}
