//! Request and response bodies for the guide endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/v1/analyze` and `POST /api/v1/respond`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub user_id: String,
    pub query: String,
    #[serde(default)]
    pub context: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        let details = if err.details.is_empty() {
            None
        } else {
            serde_json::to_value(&err.details).ok()
        };
        let code = match err.code {
            ErrorCode::ProfileNotFound => "NOT_FOUND".to_string(),
            other => other.to_string(),
        };
        Self {
            code,
            message: err.message,
            details,
        }
    }
}
