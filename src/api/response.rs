//! Response envelope and error-to-HTTP mapping.
//!
//! Every endpoint answers with the same JSON shape:
//!
//! ```json
//! {
//!   "success": true,
//!   "data": { ... },
//!   "message": "Employee retrieved successfully",
//!   "count": 3,
//!   "error": null,
//!   "timestamp": "2025-11-02T16:30:00.123Z"
//! }
//! ```
//!
//! `data`, `count` and `error` are omitted when absent.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::AppError;

/// Application-level result for HTTP handlers.
pub type AppResult<T> = Result<T, AppError>;

/// API response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying data.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            count: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Successful response with a message only.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: message.into(),
            count: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Failed response.
    pub fn error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            count: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Successful list response; `count` is the number of items.
    pub fn list(items: Vec<T>, message: impl Into<String>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::success(items, message)
        }
    }
}

/// Wrap data in a successful envelope.
pub fn ok<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data, message))
}

/// Wrap a list in a successful envelope with its count.
pub fn ok_list<T: Serialize>(items: Vec<T>, message: impl Into<String>) -> Json<ApiResponse<Vec<T>>> {
    Json(ApiResponse::list(items, message))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => {
                warn!(error = %msg, "Resource not found");
                respond(StatusCode::NOT_FOUND, ApiResponse::<()>::error(msg, "Resource not found"))
            }
            AppError::DuplicateResource(msg) => {
                warn!(error = %msg, "Duplicate resource");
                respond(StatusCode::CONFLICT, ApiResponse::<()>::error(msg, "Duplicate resource"))
            }
            AppError::Validation(msg) => {
                warn!(error = %msg, "Invalid argument");
                respond(StatusCode::BAD_REQUEST, ApiResponse::<()>::error(msg, "Invalid argument"))
            }
            AppError::InvalidFields(fields) => {
                warn!(?fields, "Validation failed");
                let body = ApiResponse {
                    data: Some(fields),
                    ..ApiResponse::error("Validation failed", "Invalid input data")
                };
                respond(StatusCode::BAD_REQUEST, body)
            }
            other => {
                error!(error = %other, "Unexpected error");
                respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error("An unexpected error occurred", "Internal server error"),
                )
            }
        }
    }
}

fn respond<T: Serialize>(status: StatusCode, body: ApiResponse<T>) -> Response {
    (status, Json(body)).into_response()
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Malformed request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Invalid query parameter: {}", rejection.body_text()))
    }
}
