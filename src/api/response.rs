//! Response envelopes for the hotel API.
//!
//! Successful calls answer `{"status":"success","message":..,"data":..}`,
//! failures `{"status":"error","code":..,"message":..,"errors":..}`.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::HotelError;

/// Success envelope body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    /// Always `"success"`.
    pub status: String,
    /// Human-readable summary.
    pub message: String,
    /// The payload.
    pub data: T,
}

/// A success envelope with its HTTP status.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: ApiSuccess<T>,
}

impl<T> ApiResponse<T> {
    /// 200 OK.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, data)
    }

    /// 201 Created.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status,
            body: ApiSuccess {
                status: "success".to_string(),
                message: message.into(),
                data,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.body),
        )
            .into_response()
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Always `"error"`.
    pub status: String,
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Per-field failures or rule details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            code: code.into(),
            message: message.into(),
            errors: None,
        }
    }

    /// Creates a new API error carrying structured errors.
    pub fn with_errors(
        code: impl Into<String>,
        message: impl Into<String>,
        errors: serde_json::Value,
    ) -> Self {
        Self {
            errors: Some(errors),
            ..Self::new(code, message)
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 with the given code.
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new(code, message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<HotelError> for ApiErrorResponse {
    fn from(err: HotelError) -> Self {
        let message = err.to_string();
        match err {
            HotelError::Validation { errors } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_errors(
                    "VALIDATION_ERROR",
                    "Validation failed",
                    serde_json::to_value(errors).unwrap_or_default(),
                ),
            },
            HotelError::StateConflict { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("STATE_CONFLICT", message),
            },
            HotelError::NotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", message),
            },
            HotelError::BusinessRule { details, .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError {
                    errors: details,
                    ..ApiError::new("BUSINESS_RULE", message)
                },
            },
            HotelError::InvalidSignature => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_SIGNATURE", message),
            },
            HotelError::ConfigNotFound { .. } | HotelError::ConfigParseError { .. } => {
                error!(error = %message, "Configuration error while serving request");
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::new("CONFIG_ERROR", "Configuration error"),
                }
            }
            HotelError::Internal { .. } => {
                error!(error = %message, "Internal error while serving request");
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::new("INTERNAL_ERROR", "An unexpected error occurred"),
                }
            }
        }
    }
}
