//! Error types for the outbound client.
//!
//! # Design
//! Every non-2xx response lands in `Status` with the raw status code and body
//! for debugging. Callers that care about "the resource does not exist" ask
//! `is_not_found` instead of matching on a dedicated variant, so all status
//! failures propagate through one path.

/// Errors returned by `HttpService`, `ResponseWrapper` and transports.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The transport could not complete the round-trip (connection refused,
    /// DNS failure, unreadable body).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a status outside 200..=299.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
