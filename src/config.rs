//! Process configuration, read once at startup

use reqwest::Url;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BACKEND_URL is not set")]
    MissingBackendUrl,
    #[error("BACKEND_URL is not a valid URL: {0}")]
    InvalidBackendUrl(String),
    #[error("BACKEND_URL must be an http(s) URL, got scheme {0:?}")]
    UnsupportedScheme(String),
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream riddle service
    pub backend_url: Url,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("BACKEND_URL").ok().as_deref(),
            std::env::var("RIDDLE_QUEST_PORT").ok().as_deref(),
        )
    }

    fn from_vars(backend_url: Option<&str>, port: Option<&str>) -> Result<Self, ConfigError> {
        let raw = backend_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingBackendUrl)?;

        let backend_url =
            Url::parse(raw).map_err(|e| ConfigError::InvalidBackendUrl(e.to_string()))?;
        if !matches!(backend_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(
                backend_url.scheme().to_string(),
            ));
        }

        let port = port.and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT);

        Ok(Self { backend_url, port })
    }
}
