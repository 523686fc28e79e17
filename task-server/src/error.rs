//! Global handler for failures the routes chose not to answer locally.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rest_core::{ErrorPayload, HandlerError};

/// A propagated handler failure. Always answered with a redacted 500.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct AppError(#[from] HandlerError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(kind = %self.0.kind(), error = %self.0, "unhandled handler failure");
        let payload = ErrorPayload::developer(&self.0).redacted();
        (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
    }
}
