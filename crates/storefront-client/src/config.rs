//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CLOVE_API_URL` - Base URL of the commerce REST API
//!
//! ## Optional
//! - `CLOVE_STATE_DIR` - Directory for persisted state (default: `.clove`)
//! - `CLOVE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_STATE_DIR: &str = ".clove";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the commerce REST API
    pub api_base: Url,
    /// Directory where persisted slices are written
    pub state_dir: PathBuf,
    /// Per-request timeout for API calls
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration directly (hosts and tests).
    #[must_use]
    pub fn new(api_base: Url, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_base,
            state_dir: state_dir.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base = get_required_env("CLOVE_API_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("CLOVE_API_URL".to_string(), e.to_string()))?;

        let state_dir = PathBuf::from(get_env_or_default("CLOVE_STATE_DIR", DEFAULT_STATE_DIR));

        let request_timeout = get_env_or_default(
            "CLOVE_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("CLOVE_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base,
            state_dir,
            request_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_default_timeout() {
        let config = ClientConfig::new(Url::parse("http://localhost:8080").unwrap(), "/tmp/state");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/state"));
    }

    #[test]
    fn test_missing_required_env() {
        let result = get_required_env("CLOVE_TEST_VAR_THAT_DOES_NOT_EXIST");
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn test_env_default_fallback() {
        let value = get_env_or_default("CLOVE_TEST_OTHER_MISSING_VAR", "fallback");
        assert_eq!(value, "fallback");
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_from_env_validates_api_url() {
        // SAFETY: test-only process env mutation; this is the only test
        // touching CLOVE_API_URL.
        unsafe { std::env::remove_var("CLOVE_API_URL") };
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ConfigError::MissingEnvVar(_))
        ));

        unsafe { std::env::set_var("CLOVE_API_URL", "not a url") };
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));

        unsafe { std::env::set_var("CLOVE_API_URL", "http://localhost:8080/") };
        let config = ClientConfig::from_env().expect("valid config");
        assert_eq!(config.api_base.as_str(), "http://localhost:8080/");
        assert_eq!(config.state_dir, PathBuf::from(DEFAULT_STATE_DIR));

        unsafe { std::env::remove_var("CLOVE_API_URL") };
    }
}
