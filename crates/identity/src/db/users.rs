//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use clementine_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::User;

/// Row shape shared by the user queries.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: Email,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let role = self.role.parse::<Role>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            email: self.email,
            role,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserWithPasswordRow {
    id: i64,
    email: Email,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a pre-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, role, created_at
            ",
        )
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored role is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, role, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user together with their password hash, for credential checks.
    ///
    /// Returns `None` if no account exists for the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored role is invalid.
    pub async fn get_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithPasswordRow>(
            r"
            SELECT id, email, role, password_hash, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let user = UserRow {
            id: r.id,
            email: r.email,
            role: r.role,
            created_at: r.created_at,
        }
        .into_user()?;

        Ok(Some((user, r.password_hash)))
    }
}
