//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPLY_API_BASE_URL` - Base URL of the catalog/cart backend
//!
//! ## Optional
//! - `SHOPLY_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPLY_PORT` - Listen port (default: 3000)
//! - `SHOPLY_API_USERNAME` - Backend Basic auth user
//! - `SHOPLY_API_PASSWORD` - Backend Basic auth password
//! - `SHOPLY_PAGE_SIZE` - Products requested per page (default: 20)
//! - `SHOPLY_REQUEST_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `SHOPLY_ERROR_TOAST_SECS` - How long an error toast stays visible (default: 3)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MAX_PAGE_SIZE: u32 = 100;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Backend API configuration
    pub api: ApiConfig,
    /// How long an error toast stays visible
    pub error_toast_duration: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, always ending in `/`
    pub base_url: Url,
    /// Basic auth credentials, if the backend requires them
    pub credentials: Option<ApiCredentials>,
    /// Products requested per page
    pub page_size: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Basic auth credentials for the backend.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct ApiCredentials {
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or("SHOPLY_HOST", "127.0.0.1".parse::<IpAddr>().ok())?;
        let port = env.parse_or("SHOPLY_PORT", Some(3000_u16))?;
        let toast_secs = env.parse_or("SHOPLY_ERROR_TOAST_SECS", Some(3_u64))?;

        Ok(Self {
            host,
            port,
            api: ApiConfig::from_env(&env)?,
            error_toast_duration: Duration::from_secs(toast_secs),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ApiConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&env.required("SHOPLY_API_BASE_URL")?)?;

        let credentials = match (
            env.optional("SHOPLY_API_USERNAME"),
            env.optional("SHOPLY_API_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(ApiCredentials {
                username,
                password: SecretString::from(password),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingEnvVar("SHOPLY_API_PASSWORD".into())),
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar("SHOPLY_API_USERNAME".into())),
        };

        let page_size = env.parse_or("SHOPLY_PAGE_SIZE", Some(20_u32))?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPLY_PAGE_SIZE".into(),
                format!("must be between 1 and {MAX_PAGE_SIZE} (got {page_size})"),
            ));
        }

        let timeout_secs = env.parse_or("SHOPLY_REQUEST_TIMEOUT_SECS", Some(10_u64))?;

        Ok(Self {
            base_url,
            credentials,
            page_size,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parse the backend base URL, making sure relative joins keep its path.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("SHOPLY_API_BASE_URL".into(), msg);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: Option<T>) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(value) => value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => default.ok_or_else(|| ConfigError::MissingEnvVar(key.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("SHOPLY_API_BASE_URL", "http://localhost:8080")]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.api.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.api.page_size, 20);
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.error_toast_duration, Duration::from_secs(3));
        assert!(config.api.credentials.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_base_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "SHOPLY_API_BASE_URL"));
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let config = load(&[("SHOPLY_API_BASE_URL", "https://api.example.com/v1")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://api.example.com/v1/");
        assert_eq!(
            config.api.base_url.join("products").unwrap().as_str(),
            "https://api.example.com/v1/products"
        );
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        let err = load(&[("SHOPLY_API_BASE_URL", "ftp://example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[
            ("SHOPLY_API_BASE_URL", "http://localhost:8080"),
            ("SHOPLY_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SHOPLY_PORT"));
    }

    #[test]
    fn test_page_size_bounds() {
        for size in ["0", "101"] {
            let err = load(&[
                ("SHOPLY_API_BASE_URL", "http://localhost:8080"),
                ("SHOPLY_PAGE_SIZE", size),
            ])
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
        }
    }

    #[test]
    fn test_credentials_must_come_in_pairs() {
        let err = load(&[
            ("SHOPLY_API_BASE_URL", "http://localhost:8080"),
            ("SHOPLY_API_USERNAME", "shopper"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "SHOPLY_API_PASSWORD"));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let config = load(&[
            ("SHOPLY_API_BASE_URL", "http://localhost:8080"),
            ("SHOPLY_API_USERNAME", "shopper"),
            ("SHOPLY_API_PASSWORD", "hunter2-but-longer"),
        ])
        .unwrap();

        let credentials = config.api.credentials.unwrap();
        assert_eq!(credentials.password.expose_secret(), "hunter2-but-longer");

        let debug_output = format!("{credentials:?}");
        assert!(debug_output.contains("shopper"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
    }
}
