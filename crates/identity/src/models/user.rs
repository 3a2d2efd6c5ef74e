//! User account model.

use chrono::{DateTime, Utc};

use clementine_core::{Email, Role, UserId};

/// A registered account.
///
/// The password hash is deliberately not part of this struct; it is only
/// surfaced by the repository call that verifies credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Database identifier.
    pub id: UserId,
    /// Unique login email, lowercased.
    pub email: Email,
    /// Role granted at registration.
    pub role: Role,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
