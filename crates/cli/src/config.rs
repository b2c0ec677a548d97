//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GOMARKET_DATA_DIR` - Directory for the file-backed cart store
//!   (default: `.gomarket`)
//! - `GOMARKET_CURRENCY` - ISO 4217 display currency (default: `USD`)

use std::path::PathBuf;

use thiserror::Error;

use gomarket_core::CurrencyCode;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory for the file-backed cart store.
    pub data_dir: PathBuf,
    /// Display currency for formatted totals.
    pub currency: CurrencyCode,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("GOMARKET_DATA_DIR", ".gomarket"));

        let currency = get_env_or_default("GOMARKET_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("GOMARKET_CURRENCY".to_string(), e.to_string()))?;

        Ok(Self { data_dir, currency })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
