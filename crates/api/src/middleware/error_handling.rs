//! # Error Handling Middleware
//!
//! Maps the assistant's error taxonomy to HTTP status codes and JSON error
//! responses so every endpoint fails the same way. Built on Axum's
//! `IntoResponse` mechanism.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use portfolio_core::errors::AssistantError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps [`AssistantError`] values and implements
/// `IntoResponse`, so handlers can use `?` on domain calls and return the
/// taxonomy untouched.
#[derive(Debug)]
pub struct AppError(pub AssistantError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AssistantError::Validation(_) => StatusCode::BAD_REQUEST,
            AssistantError::NotFound(_) => StatusCode::NOT_FOUND,
            // No availability left inside the scan horizon
            AssistantError::HorizonExhausted { .. } => StatusCode::NOT_FOUND,
            // External-service problems: not the visitor's fault
            AssistantError::Authorization(_) => StatusCode::BAD_GATEWAY,
            AssistantError::BookingFailed(_) => StatusCode::BAD_GATEWAY,
            AssistantError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            AssistantError::External(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Allows `?` on functions returning `Result<T, AssistantError>` inside
/// handlers that return `Result<T, AppError>`.
impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(AssistantError::External(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AssistantError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AssistantError::NotFound("session".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                AssistantError::HorizonExhausted { days: 30 },
                StatusCode::NOT_FOUND,
            ),
            (
                AssistantError::Authorization("401".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AssistantError::BookingFailed("500".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AssistantError::Transient("timeout".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
