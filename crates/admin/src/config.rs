//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPDESK_API_URL` - Base URL of the store backend API
//! - `SHOPDESK_API_TOKEN` - Bearer token for the backend API
//!
//! ## Optional
//! - `SHOPDESK_DISCOVERY_ATTEMPTS` - Polling ceiling for new-order
//!   discovery (default: 10)
//! - `SHOPDESK_DISCOVERY_DELAY_MS` - Delay between discovery polls in
//!   milliseconds (default: 500)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::orders::DiscoveryConfig;

const DEFAULT_DISCOVERY_ATTEMPTS: u32 = 10;
const DEFAULT_DISCOVERY_DELAY_MS: u64 = 500;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the store backend API.
    pub api_base_url: Url,
    /// Bearer token for the backend API.
    pub api_token: SecretString,
    /// New-order discovery polling parameters.
    pub discovery: DiscoveryConfig,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = required("SHOPDESK_API_URL")?;
        let api_base_url = Url::parse(&api_base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPDESK_API_URL".into(), e.to_string()))?;

        let api_token = SecretString::from(required("SHOPDESK_API_TOKEN")?);

        let attempts = optional_parsed("SHOPDESK_DISCOVERY_ATTEMPTS", DEFAULT_DISCOVERY_ATTEMPTS)?;
        let delay_ms = optional_parsed("SHOPDESK_DISCOVERY_DELAY_MS", DEFAULT_DISCOVERY_DELAY_MS)?;

        Ok(Self {
            api_base_url,
            api_token,
            discovery: DiscoveryConfig {
                attempts,
                delay: Duration::from_millis(delay_ms),
            },
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional_parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}
