//! Shared API response envelope.

use serde::{Deserialize, Serialize};

/// Minimal status envelope used by health endpoints and error bodies.
///
/// Every service speaks this shape for non-entity responses, so clients can
/// uniformly check `ok` and surface `message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiMessage {
    /// Whether the request succeeded.
    pub ok: bool,
    /// Human-readable detail, present on failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiMessage {
    /// Success envelope with no message.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    /// Failure envelope with a message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_omits_message() {
        let json = serde_json::to_string(&ApiMessage::ok()).unwrap();
        assert_eq!(json, "{\"ok\":true}");
    }

    #[test]
    fn test_error_carries_message() {
        let json = serde_json::to_string(&ApiMessage::error("Empty cart")).unwrap();
        assert_eq!(json, "{\"ok\":false,\"message\":\"Empty cart\"}");
    }
}
