//! Order service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ORDERS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `JWT_SECRET` - base64-encoded HMAC secret shared with the identity service
//! - `PRODUCT_BASE_URL` - Base URL of the catalog service (e.g., `http://catalog:9002`)
//!
//! ## Optional
//! - `ORDERS_HOST` - Bind address (default: 127.0.0.1)
//! - `ORDERS_PORT` - Listen port (default: 9003)
//! - `CATALOG_TIMEOUT_SECS` - Outbound request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Order service configuration.
#[derive(Debug, Clone)]
pub struct OrdersConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base64-encoded HMAC secret for verifying bearer tokens
    pub jwt_secret: SecretString,
    /// Base URL of the catalog service
    pub product_base_url: String,
    /// Timeout applied to every outbound catalog call
    pub catalog_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl OrdersConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the verification secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ORDERS_DATABASE_URL")?;
        let host = get_env_or_default("ORDERS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORDERS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ORDERS_PORT", "9003")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORDERS_PORT".to_string(), e.to_string()))?;

        let jwt_secret = get_signing_secret("JWT_SECRET")?;

        let product_base_url = get_required_env("PRODUCT_BASE_URL")?;
        Url::parse(&product_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("PRODUCT_BASE_URL".to_string(), e.to_string())
        })?;

        let timeout_secs = get_env_or_default("CATALOG_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            product_base_url,
            catalog_timeout: Duration::from_secs(timeout_secs),
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Load and validate the base64-encoded verification secret.
fn get_signing_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_signing_secret(&value, key)?;
    Ok(SecretString::from(value))
}

/// Validate a verification secret: no placeholders, sufficient entropy,
/// decodable base64.
fn validate_signing_secret(value: &str, key: &str) -> Result<(), ConfigError> {
    let lower = value.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                key.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    if BASE64.decode(value).is_err() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be valid base64".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_secret_rejected() {
        let result = validate_signing_secret("your-signing-key", "JWT_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_valid_secret_accepted() {
        let result =
            validate_signing_secret("kJ8zW2qR5tY7uP3oL9xC4vB6nM1aS0dF+gH/jQ==", "JWT_SECRET");
        assert!(result.is_ok());
    }
}
