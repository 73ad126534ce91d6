//! Application error taxonomy.
//!
//! Every failure a handler can produce is funneled through [`AppError`], which
//! knows how to render itself as a JSON HTTP response. The variants mirror the
//! classes of failure the API distinguishes on the wire: request validation,
//! missing or bad credentials, lookups that found nothing, registration
//! conflicts, and everything else from the store collapsing to a 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;

/// Convenience alias used by handlers and store functions alike.
pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// A protected route was hit without any token (cookie or header).
    #[error("No token provided")]
    MissingToken,

    /// Login failed; unknown user and wrong password are indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Request was syntactically fine but semantically rejected.
    #[error("{0}")]
    BadRequest(&'static str),

    /// Lookup by id or name matched nothing; message is per-endpoint.
    #[error("{0}")]
    NotFound(&'static str),

    /// One or more request fields failed declarative validation.
    #[error("Invalid request body")]
    Validation(#[from] validator::ValidationErrors),

    /// Registration clashed with existing rows; carries every reason.
    #[error("Conflict")]
    Conflict(Vec<String>),

    /// Token was malformed, mis-signed, or expired.
    #[error("JWT error: {0:?}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Anything unexpected from the durable store.
    #[error("SQL failed: {0:?}")]
    Sqlx(#[from] sqlx::Error),

    /// Internal failures outside the store (e.g. password hashing).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Flattens `validator`'s nested error map into the flat list of messages the
/// original API reported, one entry per failed rule.
pub fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for field_error in field_errors {
            match &field_error.message {
                Some(message) => messages.push(message.to_string()),
                None => messages.push(format!("{} is invalid", field)),
            }
        }
    }
    messages.sort();
    messages
}

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::MissingToken => (
                StatusCode::FORBIDDEN,
                json!({ "message": self.to_string() }),
            ),
            AppError::Jwt(_) => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Unauthorized" }),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": self.to_string() }),
            ),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "message": message }))
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "message": message })),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "errors": validation_messages(errors) }),
            ),
            AppError::Conflict(reasons) => (StatusCode::CONFLICT, json!({ "errors": reasons })),
            AppError::Sqlx(_) | AppError::Internal(_) => {
                error!("internal error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": self.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
