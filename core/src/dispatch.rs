//! Per-invocation error dispatch for inbound handlers.
//!
//! # Design
//! `ErrorDispatch` runs a handler and turns its result into an `Outcome`:
//!
//! - success: `Success(value)`, or `NoContent` for unit handlers;
//! - a classified failure carrying `Issue::NoEntityWasFound`: `NotFound`,
//!   checked first and independent of the `HandlingMode`;
//! - anything else: either `ClassifiedError(payload)` or `Err(failure)`
//!   (propagated to the host's global handler), depending on the mode.
//!
//! The environment is fixed when the dispatcher is built. In production the
//! payload is redacted before it is returned.

use std::future::Future;
use std::str::FromStr;

use crate::domain::{ErrorPayload, HandlerError};

/// Which failures are answered locally and which are re-raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandlingMode {
    /// Re-raise everything except the not-found shortcut.
    #[default]
    HandleAllGlobally,
    /// Answer logical, validation and invariant failures locally; re-raise
    /// technical ones.
    DeferDomainErrors,
    /// Answer every failure locally.
    DeferAll,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    /// Strict lookup: `development`/`dev` and `production`/`prod`, any case.
    /// Anything else is `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    /// `production` and `prod` (any case) select production; anything else
    /// is development.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Environment::from_name(s).unwrap_or_default())
    }
}

/// Terminal state of one wrapped invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    NoContent,
    NotFound,
    ClassifiedError(ErrorPayload),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_) | Outcome::NoContent)
    }

    pub fn status(&self) -> u16 {
        match self {
            Outcome::Success(_) => 200,
            Outcome::NoContent => 204,
            Outcome::NotFound => 404,
            Outcome::ClassifiedError(_) => 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorDispatch {
    environment: Environment,
}

impl ErrorDispatch {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Run `handler` and map its result to an `Outcome`. `Err` means the
    /// failure was propagated unchanged.
    pub async fn view<T, F, Fut>(&self, mode: HandlingMode, handler: F) -> Result<Outcome<T>, HandlerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, HandlerError>>,
    {
        match handler().await {
            Ok(value) => Ok(Outcome::Success(value)),
            Err(failure) => self.classify(mode, failure),
        }
    }

    /// Like [`view`](Self::view) for handlers without a value; success is
    /// `NoContent`.
    pub async fn view_unit<F, Fut>(&self, mode: HandlingMode, handler: F) -> Result<Outcome<()>, HandlerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), HandlerError>>,
    {
        match handler().await {
            Ok(()) => Ok(Outcome::NoContent),
            Err(failure) => self.classify(mode, failure),
        }
    }

    /// Run `handler` and hand back its failure as a payload instead of
    /// propagating it. `None` means the handler succeeded.
    pub async fn catch_domain_errors<F, Fut>(&self, handler: F) -> Option<ErrorPayload>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), HandlerError>>,
    {
        match handler().await {
            Ok(()) => None,
            Err(failure) => {
                tracing::debug!(kind = %failure.kind(), error = %failure, "caught handler failure");
                Some(self.payload(&failure))
            }
        }
    }

    /// The state machine behind `view` and `view_unit`.
    pub fn classify<T>(&self, mode: HandlingMode, failure: HandlerError) -> Result<Outcome<T>, HandlerError> {
        if failure.is_entity_not_found() {
            tracing::debug!(error = %failure, "no entity was found");
            return Ok(Outcome::NotFound);
        }

        let handle_locally = match mode {
            HandlingMode::HandleAllGlobally => false,
            HandlingMode::DeferAll => true,
            HandlingMode::DeferDomainErrors => failure.kind().is_domain(),
        };
        if !handle_locally {
            return Err(failure);
        }

        tracing::warn!(kind = %failure.kind(), ?mode, error = %failure, "handler failed");
        Ok(Outcome::ClassifiedError(self.payload(&failure)))
    }

    /// Payload for `failure`, redacted in production.
    pub fn payload(&self, failure: &HandlerError) -> ErrorPayload {
        let payload = ErrorPayload::developer(failure);
        if self.environment.is_production() {
            payload.redacted()
        } else {
            payload
        }
    }
}

#[cfg(feature = "axum")]
mod axum_response {
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use serde::Serialize;

    use super::Outcome;

    impl<T: Serialize> IntoResponse for Outcome<T> {
        fn into_response(self) -> Response {
            match self {
                Outcome::Success(value) => Json(value).into_response(),
                Outcome::NoContent => StatusCode::NO_CONTENT.into_response(),
                Outcome::NotFound => StatusCode::NOT_FOUND.into_response(),
                Outcome::ClassifiedError(payload) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
                }
            }
        }
    }
}
