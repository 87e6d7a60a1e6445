// ABOUTME: Centralized error handling system with detailed context and logging
// ABOUTME: Maps application errors to HTTP responses without leaking internals

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// One per-field validation failure, rendered back to the submitting form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Database(sea_orm::DbErr),
    Validation(Vec<FieldError>),
    DuplicateUsername(String),
    InvalidCredentials,
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(err) => write!(f, "Database error: {}", err),
            AppError::Validation(errors) => write!(f, "Validation failed ({} fields)", errors.len()),
            AppError::DuplicateUsername(name) => write!(f, "Username already taken: {}", name),
            AppError::InvalidCredentials => write!(f, "Invalid username or password"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Database(_) => {
                tracing::error!("Database error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Database operation failed"}),
                )
            }
            AppError::Validation(errors) => {
                tracing::info!("Validation failed: {:?}", errors);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({"error": "Validation failed", "errors": errors}),
                )
            }
            AppError::DuplicateUsername(_) => {
                tracing::info!("{}", self);
                (
                    StatusCode::CONFLICT,
                    json!({"error": "Username already taken"}),
                )
            }
            // One message for unknown user and wrong password, deliberately.
            AppError::InvalidCredentials => {
                tracing::info!("Login failed");
                (
                    StatusCode::UNAUTHORIZED,
                    json!({"error": "Invalid username or password"}),
                )
            }
            AppError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    json!({"error": "Authentication required"}),
                )
            }
            // Ownership failures render identically to nonexistent rows so
            // another user's resource ids cannot be probed.
            AppError::NotFound(msg) => {
                tracing::info!("Resource not found: {}", msg);
                (StatusCode::NOT_FOUND, json!({"error": "Resource not found"}))
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, json!({"error": msg}))
            }
            AppError::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error"}),
                )
            }
        };

        let status_code = status.as_u16();
        let mut body = body;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("status".to_string(), json!(status_code));
        }

        (status, Json(body)).into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {}", err))
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Malformed multipart request: {}", err))
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AppError::Internal(format!("Password hashing failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
