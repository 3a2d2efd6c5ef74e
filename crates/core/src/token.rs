//! Signed, time-bounded identity tokens.
//!
//! Tokens are HMAC-SHA256 JWTs carrying the subject (user email), role, and a
//! token type. The signing secret is configured as base64 and shared between
//! the issuing identity service and every verifying service; there is no
//! server-side session store. Verification is local and requires no network
//! round trip.
//!
//! Token-type checking is part of the verification contract: every call site
//! names the type it expects, so a refresh token is never accepted where an
//! access token is required.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::types::{Email, Role};

/// Distinguishes short-lived access tokens from long-lived refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Grants access to protected endpoints.
    Access,
    /// Exchangeable for a fresh access token, nothing else.
    Refresh,
}

impl core::fmt::Display for TokenType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        })
    }
}

/// Claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email address.
    pub sub: String,
    /// Role granted at issue time.
    pub role: Role,
    /// Access or refresh.
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds); always greater than `iat`.
    pub exp: i64,
}

/// Errors from issuing or verifying tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The configured signing secret is not valid base64. Fatal at startup;
    /// a service refusing this error must not come up.
    #[error("invalid signing key: {0}")]
    Key(#[source] jsonwebtoken::errors::Error),

    /// Signing failed. Cannot happen with a well-formed HMAC key.
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    /// The token's expiry has passed. A normal failure, not an attack signal.
    #[error("token expired")]
    Expired,

    /// Signature mismatch or malformed payload.
    #[error("token rejected")]
    Invalid,

    /// Well-formed and live, but the wrong token type for this call site.
    #[error("expected {expected} token")]
    WrongType {
        /// The type the call site required.
        expected: TokenType,
    },
}

/// Issues and verifies tokens with a shared symmetric key.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from a base64-encoded HMAC secret.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Key`] when the secret is not valid base64.
    pub fn from_base64_secret(secret: &str) -> Result<Self, TokenError> {
        let encoding = EncodingKey::from_base64_secret(secret).map_err(TokenError::Key)?;
        let decoding = DecodingKey::from_base64_secret(secret).map_err(TokenError::Key)?;

        let mut validation = Validation::new(Algorithm::HS256);
        // `exp <= now` fails verification exactly at expiry
        validation.leeway = 0;

        Ok(Self {
            encoding,
            decoding,
            validation,
        })
    }

    /// Issue a signed token with `iat = now` and `exp = now + ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Sign`] if signing fails.
    pub fn issue(
        &self,
        subject: &Email,
        role: Role,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.as_str().to_owned(),
            role,
            token_type,
            iat: now,
            exp: now + ttl.num_seconds(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Verify a token and require it to be of `expected` type.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] for a well-formed token past its
    /// expiry, [`TokenError::WrongType`] for a live token of the wrong type,
    /// and [`TokenError::Invalid`] for everything else (bad signature,
    /// malformed payload, missing claims).
    pub fn verify(&self, encoded: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let data =
            decode::<Claims>(encoded, &self.decoding, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        if data.claims.token_type != expected {
            return Err(TokenError::WrongType { expected });
        }

        Ok(data.claims)
    }
}
