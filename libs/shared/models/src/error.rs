use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        /// Extra body fields identifying the conflicting entity
        /// (e.g. `conflictingSlot`, `conflictingAppointment`).
        details: Value,
    },

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            // Scheduling conflicts are caller errors, reported alongside the
            // entity that blocked the request.
            AppError::Conflict { message, details } => {
                (StatusCode::BAD_REQUEST, message, Some(details))
            }
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            AppError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
        };

        tracing::error!("Error: {}: {}", status, message);

        let mut body = serde_json::Map::new();
        body.insert("error".to_string(), json!(message));
        if let Some(Value::Object(extra)) = details {
            body.extend(extra);
        }

        (status, Json(Value::Object(body))).into_response()
    }
}
