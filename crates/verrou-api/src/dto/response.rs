//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Standard success envelope: `{ "data": ..., "message": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
    /// Optional human-readable outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    /// Creates a successful response with a message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// A response that only carries a message; `data` serializes as `null`.
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_message((), message)
    }
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count value.
    pub count: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `connected` or `disconnected`.
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_omitted_when_absent() {
        let body = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(body, serde_json::json!({ "data": 3 }));
    }

    #[test]
    fn message_only_response_has_null_data() {
        let body = serde_json::to_value(ApiResponse::message("Done")).unwrap();
        assert_eq!(body, serde_json::json!({ "data": null, "message": "Done" }));
    }
}
