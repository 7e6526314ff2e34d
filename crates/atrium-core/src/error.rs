//! The domain error shape carried across every service boundary.
//!
//! Each crate keeps its own thiserror enum close to the code that raises it;
//! everything that leaves the substrate is normalized into [`DomainError`],
//! which is what the out-of-scope HTTP layer turns into a response.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Wire shape: `{ message, details?, status_code }`.
#[derive(Debug, Clone, Serialize, Error)]
#[error("{message}")]
pub struct DomainError {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    pub status_code: u16,
}

impl DomainError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            details: None,
            status_code,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// 400: malformed input rejected before it reached the store.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, 400)
    }

    /// 401: no valid identity could be established.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message, 401)
    }

    /// 403: valid identity, insufficient capability.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message, 403)
    }

    /// 404: update/delete matched zero records.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, 404)
    }

    /// 409: uniqueness-constraint conflict.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(message, 409)
    }

    /// 500: unclassified failure, original message preserved.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message, 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_without_empty_details() {
        let err = DomainError::not_found("no such workspace");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["status_code"], 404);
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_details_round_trip() {
        let err = DomainError::conflict("uuid already taken")
            .with_details(json!({"property": "uuid"}));
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["details"]["property"], "uuid");
    }
}
