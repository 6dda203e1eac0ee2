//! API error handling
//!
//! Every failure surfaces as an [`AppError`], which renders the uniform
//! error envelope `{statusCode, data, message, success, errors}` shared
//! with successful responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::store::StoreError;

/// A single failed validation, attached to the error envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Validation code (e.g. "email", "length")
    pub code: String,
}

/// Application error type
///
/// Conflict-class failures (duplicate email or student id) are rendered as
/// `BadRequest`, matching the wire behavior this API's clients expect.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Validation(Vec<FieldError>),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Internal(msg) => msg,
            AppError::Validation(_) => "Validation failed",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let errors = match &self {
            AppError::Validation(errors) => serde_json::json!(errors),
            _ => serde_json::json!([]),
        };
        let body = serde_json::json!({
            "statusCode": status.as_u16(),
            "data": null,
            "message": self.message(),
            "success": false,
            "errors": errors,
        });

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("User not found".to_string()),
            StoreError::DuplicateEmail => {
                AppError::BadRequest("User already exists with this email".to_string())
            }
            StoreError::DuplicateStudentId => {
                AppError::BadRequest("Student ID already exists".to_string())
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
