//! Status enums for persisted entities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created atomically with their items and are immutable
/// afterwards; `Created` is the only state this system produces. The enum
/// exists so later lifecycle states extend a closed set rather than a loose
/// string column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Persisted by a successful checkout.
    #[default]
    Created,
}

impl OrderStatus {
    /// Returns the canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Created).unwrap(),
            "\"CREATED\""
        );
    }
}
