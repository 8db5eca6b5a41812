//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `HANDOFF_RECIPIENT` - Chat recipient that receives orders (digits only,
//!   international format without `+`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CATALOG_PATH` - Catalog JSON file
//!   (default: `crates/storefront/content/catalog.json`)
//! - `HANDOFF_ENDPOINT` - Chat endpoint base URL (default: `https://wa.me/`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use alforja_core::HandoffChannel;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_PATH: &str = "crates/storefront/content/catalog.json";

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
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog JSON file loaded at startup
    pub catalog_path: PathBuf,
    /// Where finished orders are sent
    pub handoff: HandoffConfig,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// Order hand-off channel configuration.
#[derive(Debug, Clone)]
pub struct HandoffConfig {
    /// Endpoint base URL, e.g. `https://wa.me/`
    pub endpoint: String,
    /// Recipient identifier appended to the endpoint
    pub recipient: String,
}

/// Sentry configuration.
///
/// Implements `Debug` manually to redact the DSN.
#[derive(Clone, Default)]
pub struct SentryConfig {
    /// DSN; Sentry stays disabled when unset
    pub dsn: Option<SecretString>,
    /// Environment tag (e.g. `production`)
    pub environment: Option<String>,
    /// Error event sample rate
    pub sample_rate: f32,
    /// Performance transaction sample rate
    pub traces_sample_rate: f32,
}

impl std::fmt::Debug for SentryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentryConfig")
            .field("dsn", &self.dsn.as_ref().map(|_| "[REDACTED]"))
            .field("environment", &self.environment)
            .field("sample_rate", &self.sample_rate)
            .field("traces_sample_rate", &self.traces_sample_rate)
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

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        validate_url(&base_url, "STOREFRONT_BASE_URL")?;
        let catalog_path =
            PathBuf::from(get_env_or_default("STOREFRONT_CATALOG_PATH", DEFAULT_CATALOG_PATH));

        let handoff = HandoffConfig::from_env()?;
        let sentry = SentryConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            handoff,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over HTTPS (enables secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl HandoffConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint = get_env_or_default("HANDOFF_ENDPOINT", HandoffChannel::DEFAULT_ENDPOINT);
        validate_url(&endpoint, "HANDOFF_ENDPOINT")?;
        let recipient = get_required_env("HANDOFF_RECIPIENT")?;
        validate_recipient(&recipient, "HANDOFF_RECIPIENT")?;
        Ok(Self {
            endpoint,
            recipient,
        })
    }

    /// Build the hand-off channel described by this configuration.
    #[must_use]
    pub fn channel(&self) -> HandoffChannel {
        HandoffChannel::new(&self.endpoint, &self.recipient)
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN").map(SecretString::from),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: get_sample_rate("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: get_sample_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
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

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a sample rate in `[0.0, 1.0]`.
fn get_sample_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate = get_env_or_default(key, default)
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Validate that a value is an absolute http(s) URL.
fn validate_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Validate that a recipient is a non-empty string of digits.
fn validate_recipient(value: &str, var_name: &str) -> Result<(), ConfigError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must contain digits only (international format without '+')".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            handoff: HandoffConfig {
                endpoint: "https://wa.me/".to_string(),
                recipient: "573234923424".to_string(),
            },
            sentry: SentryConfig::default(),
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = config();
        assert!(!config.is_secure());
        config.base_url = "https://alforjacafe.co".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_handoff_channel_from_config() {
        let link = config().handoff.channel().link("hola");
        assert_eq!(link, "https://wa.me/573234923424?text=hola");
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://wa.me/", "TEST_VAR").is_ok());
        assert!(matches!(
            validate_url("not a url", "TEST_VAR"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(validate_url("ftp://example.com", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_recipient() {
        assert!(validate_recipient("573234923424", "TEST_VAR").is_ok());
        assert!(validate_recipient("+57 323 492 3424", "TEST_VAR").is_err());
        assert!(validate_recipient("", "TEST_VAR").is_err());
    }

    #[test]
    fn test_sentry_config_debug_redacts_dsn() {
        let sentry = SentryConfig {
            dsn: Some(SecretString::from("https://super_secret_key@o0.ingest.sentry.io/1")),
            environment: Some("production".to_string()),
            sample_rate: 1.0,
            traces_sample_rate: 0.1,
        };

        let debug_output = format!("{sentry:?}");

        assert!(debug_output.contains("production"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_key"));
        assert!(
            sentry
                .dsn
                .as_ref()
                .unwrap()
                .expose_secret()
                .contains("super_secret_key")
        );
    }
}
