//! Authentication service.
//!
//! Registration, credential checks, and token issuance. Passwords are hashed
//! with Argon2id; tokens come from the shared [`TokenCodec`] so every other
//! service can verify them offline.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Duration;
use sqlx::PgPool;

use clementine_core::{Email, Role, TokenCodec, TokenType};

use crate::config::JwtConfig;
use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Tokens handed out by a successful login.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    /// Short-lived access token.
    pub token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// The authenticated account.
    pub user: User,
}

/// Authentication service.
///
/// Handles user registration, login, and the refresh grant.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenCodec,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(pool: &'a PgPool, tokens: &'a TokenCodec, jwt: &JwtConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
            access_ttl: Duration::minutes(jwt.access_ttl_minutes),
            refresh_ttl: Duration::minutes(jwt.refresh_ttl_minutes),
        }
    }

    /// Register a new user with email and password.
    ///
    /// New accounts always get the `USER` role; admin accounts are
    /// provisioned out of band.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, &password_hash, Role::User)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password, issuing an access and a refresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedTokens, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self
            .tokens
            .issue(&user.email, user.role, TokenType::Access, self.access_ttl)?;
        let refresh_token =
            self.tokens
                .issue(&user.email, user.role, TokenType::Refresh, self.refresh_ttl)?;

        Ok(IssuedTokens {
            token,
            refresh_token,
            user,
        })
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// The role is re-read from the account, so a role change takes effect on
    /// the next refresh rather than waiting out the refresh token's lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidRefreshToken` if the token is expired,
    /// tampered with, or not a refresh token.
    /// Returns `AuthError::InvalidCredentials` if the account no longer exists.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self
            .tokens
            .verify(refresh_token, TokenType::Refresh)
            .map_err(AuthError::InvalidRefreshToken)?;

        let email = Email::parse(&claims.sub).map_err(|_| AuthError::InvalidCredentials)?;
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self
            .tokens
            .issue(&user.email, user.role, TokenType::Access, self.access_ttl)?;
        Ok(token)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
