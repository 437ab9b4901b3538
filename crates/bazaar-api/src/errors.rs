// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    NotFound,
    InvalidIdentifier,
    ValidationFailed,
    RequestRejected,
    AntiForgeryRejected,
    Conflict,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::ValidationFailed => "validation_failed",
            Self::RequestRejected => "request_rejected",
            Self::AntiForgeryRejected => "anti_forgery_rejected",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

/// HTTP status for each error code. Invalid identifiers surface as 404,
/// matching the controller contract for unresolvable route ids.
#[must_use]
pub const fn status_for(code: ApiErrorCode) -> u16 {
    match code {
        ApiErrorCode::NotFound | ApiErrorCode::InvalidIdentifier => 404,
        ApiErrorCode::ValidationFailed => 422,
        ApiErrorCode::RequestRejected => 400,
        ApiErrorCode::AntiForgeryRejected => 403,
        ApiErrorCode::Conflict => 409,
        ApiErrorCode::Internal => 500,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: "req-unknown".to_string(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn not_found(resource: &str) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{resource} not found"),
            json!({"resource": resource}),
        )
    }

    #[must_use]
    pub fn invalid_identifier(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidIdentifier,
            format!("invalid identifier: {name}"),
            json!({"parameter": name, "value": value}),
        )
    }

    #[must_use]
    pub fn validation_failed(field_errors: Value) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "validation failed",
            json!({"field_errors": field_errors}),
        )
    }

    #[must_use]
    pub fn anti_forgery_rejected(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::AntiForgeryRejected,
            "anti-forgery token rejected",
            json!({"reason": reason}),
        )
    }

    #[must_use]
    pub fn conflict(resource: &str) -> Self {
        Self::new(
            ApiErrorCode::Conflict,
            format!("{resource} was modified concurrently"),
            json!({"resource": resource, "retryable": true}),
        )
    }

    #[must_use]
    pub fn internal(message: &str) -> Self {
        Self::new(ApiErrorCode::Internal, message, json!({}))
    }
}
