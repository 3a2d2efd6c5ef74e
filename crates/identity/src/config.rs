//! Identity service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `IDENTITY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `JWT_SECRET` - base64-encoded HMAC signing secret, shared with every
//!   verifying service (high entropy, no placeholders)
//!
//! ## Optional
//! - `IDENTITY_HOST` - Bind address (default: 127.0.0.1)
//! - `IDENTITY_PORT` - Listen port (default: 9001)
//! - `JWT_TTL_MINUTES` - Access token lifetime (default: 60)
//! - `JWT_REFRESH_TTL_MINUTES` - Refresh token lifetime (default: 1440)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::SecretString;
use thiserror::Error;

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

/// Identity service configuration.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing configuration
    pub jwt: JwtConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded HMAC signing secret
    pub secret: SecretString,
    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,
    /// Refresh token lifetime in minutes
    pub refresh_ttl_minutes: i64,
}

impl IdentityConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the signing secret fails validation (placeholder detection,
    /// entropy check, base64 decodability).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("IDENTITY_DATABASE_URL")?;
        let host = get_env_or_default("IDENTITY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("IDENTITY_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("IDENTITY_PORT", "9001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("IDENTITY_PORT".to_string(), e.to_string()))?;

        let jwt = JwtConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            jwt,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = get_signing_secret("JWT_SECRET")?;
        let access_ttl_minutes = get_ttl_minutes("JWT_TTL_MINUTES", "60")?;
        let refresh_ttl_minutes = get_ttl_minutes("JWT_REFRESH_TTL_MINUTES", "1440")?;

        Ok(Self {
            secret,
            access_ttl_minutes,
            refresh_ttl_minutes,
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

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a token TTL in minutes, requiring it to be positive.
fn get_ttl_minutes(key: &str, default: &str) -> Result<i64, ConfigError> {
    let minutes = get_env_or_default(key, default)
        .parse::<i64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if minutes <= 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "token TTL must be positive".to_string(),
        ));
    }
    Ok(minutes)
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

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real signing keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate the base64-encoded signing secret.
///
/// Misconfiguration here is the one fatal startup condition: a service with
/// an undecodable or weak signing key must not come up.
fn get_signing_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;

    if BASE64.decode(&value).is_err() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be valid base64".to_string(),
        ));
    }

    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-signing-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy base64 of random bytes
        let result =
            validate_secret_strength("kJ8zW2qR5tY7uP3oL9xC4vB6nM1aS0dF+gH/jQ==", "TEST_VAR");
        assert!(result.is_ok());
    }
}
