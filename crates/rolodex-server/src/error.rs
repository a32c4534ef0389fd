use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use rolodex_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Resource not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Signup is closed on this instance")]
    SignupClosed,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Validation failures carry the full set of field messages.
            ApiError::Validation(messages) => {
                let body = serde_json::json!({
                    "error": "Validation failed",
                    "messages": messages,
                });
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
            ApiError::NotFound => {
                error_response(StatusCode::NOT_FOUND, "Resource not found")
            }
            ApiError::Unauthorized => {
                error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
            }
            ApiError::SignupClosed => {
                error_response(StatusCode::FORBIDDEN, "Signup is closed on this instance")
            }
            ApiError::BadRequest(message) => {
                error_response(StatusCode::BAD_REQUEST, &format!("Invalid request: {message}"))
            }
            // No internal detail is exposed to the caller.
            ApiError::Internal(_) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "error": message,
    });
    (status, axum::Json(body)).into_response()
}
