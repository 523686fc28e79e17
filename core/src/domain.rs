//! Error taxonomy for inbound handlers.
//!
//! # Design
//! A handler fails with a `HandlerError`. Classified failures carry a
//! `DomainError` tagged with an `ErrorKind` and a list of `Issue`s; anything
//! else is `Unclassified` and counts as technical. `ErrorDispatch` decides
//! what to do with the failure by matching on these tags.
//!
//! `ErrorPayload` is the JSON body written for a locally classified failure.
//! Its `developer` section (debug rendering and source chain) is only filled
//! in outside production.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Infrastructure, transport or codec failure.
    Technical,
    /// A request that makes no sense in the current state of the domain.
    Logical,
    Validation,
    /// A broken domain invariant.
    Invariant,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Technical => "technical",
            ErrorKind::Logical => "logical",
            ErrorKind::Validation => "validation",
            ErrorKind::Invariant => "invariant",
        }
    }

    /// Logical, validation and invariant failures belong to the domain.
    pub fn is_domain(self) -> bool {
        !matches!(self, ErrorKind::Technical)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured reason attached to a `DomainError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Issue {
    /// The entity the handler looked for does not exist. Always answered
    /// with 404, whatever the handling mode.
    NoEntityWasFound {
        entity: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    InvalidValue { field: String, description: String },
    Rule { code: String, description: String },
}

impl Issue {
    pub fn no_entity_was_found(entity: impl Into<String>) -> Self {
        Issue::NoEntityWasFound {
            entity: entity.into(),
            id: None,
        }
    }

    pub fn invalid_value(field: impl Into<String>, description: impl Into<String>) -> Self {
        Issue::InvalidValue {
            field: field.into(),
            description: description.into(),
        }
    }

    pub fn rule(code: impl Into<String>, description: impl Into<String>) -> Self {
        Issue::Rule {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// A classified failure.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct DomainError {
    kind: ErrorKind,
    message: String,
    issues: Vec<Issue>,
    #[source]
    source: Option<BoxError>,
}

impl DomainError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            issues: Vec::new(),
            source: None,
        }
    }

    pub fn logical(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Logical, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invariant, message)
    }

    pub fn technical(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Technical, message)
    }

    /// Logical failure carrying `Issue::NoEntityWasFound` for `entity`/`id`.
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        let entity = entity.into();
        let id = id.to_string();
        Self::logical(format!("no {entity} was found with id {id}")).with_issue(Issue::NoEntityWasFound {
            entity,
            id: Some(id),
        })
    }

    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn has_no_entity_was_found(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, Issue::NoEntityWasFound { .. }))
    }
}

impl From<ApiError> for DomainError {
    fn from(err: ApiError) -> Self {
        DomainError::technical(err.to_string()).with_source(err)
    }
}

/// Failure returned by a handler wrapped in `ErrorDispatch`.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Classified(#[from] DomainError),

    #[error(transparent)]
    Unclassified(BoxError),
}

impl HandlerError {
    pub fn unclassified(err: impl Into<BoxError>) -> Self {
        HandlerError::Unclassified(err.into())
    }

    /// Unclassified failures count as technical.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandlerError::Classified(err) => err.kind(),
            HandlerError::Unclassified(_) => ErrorKind::Technical,
        }
    }

    pub fn is_entity_not_found(&self) -> bool {
        matches!(self, HandlerError::Classified(err) if err.has_no_entity_was_found())
    }

    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            HandlerError::Classified(err) => Some(err),
            HandlerError::Unclassified(_) => None,
        }
    }
}

impl From<ApiError> for HandlerError {
    fn from(err: ApiError) -> Self {
        HandlerError::Classified(err.into())
    }
}

pub const REDACTED_TECHNICAL_MESSAGE: &str = "an unexpected error occurred";

/// JSON body for a locally classified failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<DeveloperDetail>,
}

/// Diagnostic detail that never leaves a production process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperDetail {
    pub debug: String,
    pub source_chain: Vec<String>,
}

impl ErrorPayload {
    /// Full developer-facing representation of `failure`.
    pub fn developer(failure: &HandlerError) -> Self {
        let (kind, issues) = match failure {
            HandlerError::Classified(err) => (err.kind(), err.issues().to_vec()),
            HandlerError::Unclassified(_) => (ErrorKind::Technical, Vec::new()),
        };
        let message = match failure {
            HandlerError::Classified(err) => err.message().to_string(),
            HandlerError::Unclassified(err) => err.to_string(),
        };

        let mut source_chain = Vec::new();
        let mut source = StdError::source(failure);
        while let Some(err) = source {
            source_chain.push(err.to_string());
            source = err.source();
        }

        Self {
            kind,
            message,
            issues,
            developer: Some(DeveloperDetail {
                debug: format!("{failure:?}"),
                source_chain,
            }),
        }
    }

    /// Strip developer detail. Technical messages are replaced as well,
    /// since they describe infrastructure rather than the domain.
    pub fn redacted(mut self) -> Self {
        self.developer = None;
        if self.kind == ErrorKind::Technical {
            self.message = REDACTED_TECHNICAL_MESSAGE.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_issue() {
        let err = DomainError::not_found("Project", 42);
        assert_eq!(err.kind(), ErrorKind::Logical);
        assert!(err.has_no_entity_was_found());
        assert_eq!(err.to_string(), "logical error: no Project was found with id 42");
    }

    #[test]
    fn domain_kinds() {
        assert!(ErrorKind::Logical.is_domain());
        assert!(ErrorKind::Validation.is_domain());
        assert!(ErrorKind::Invariant.is_domain());
        assert!(!ErrorKind::Technical.is_domain());
    }

    #[test]
    fn unclassified_is_technical() {
        let err = HandlerError::unclassified(std::io::Error::other("disk full"));
        assert_eq!(err.kind(), ErrorKind::Technical);
        assert!(!err.is_entity_not_found());
        assert!(err.as_domain().is_none());
    }

    #[test]
    fn api_error_becomes_technical_with_source() {
        let err: HandlerError = ApiError::Transport("connection refused".into()).into();
        assert_eq!(err.kind(), ErrorKind::Technical);
        let payload = ErrorPayload::developer(&err);
        assert_eq!(payload.developer.unwrap().source_chain, vec!["transport failed: connection refused"]);
    }

    #[test]
    fn developer_payload_includes_issues_and_detail() {
        let err: HandlerError = DomainError::validation("project is invalid")
            .with_issue(Issue::invalid_value("name", "must not be empty"))
            .into();
        let payload = ErrorPayload::developer(&err);
        assert_eq!(payload.kind, ErrorKind::Validation);
        assert_eq!(payload.message, "project is invalid");
        assert_eq!(payload.issues.len(), 1);
        assert!(payload.developer.as_ref().unwrap().debug.contains("Validation"));
    }

    #[test]
    fn redaction_strips_developer_detail() {
        let err: HandlerError = DomainError::invariant("already archived").into();
        let payload = ErrorPayload::developer(&err).redacted();
        assert!(payload.developer.is_none());
        assert_eq!(payload.message, "already archived");

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("developer").is_none());
    }

    #[test]
    fn redaction_hides_technical_message() {
        let err = HandlerError::unclassified("db password rejected");
        let payload = ErrorPayload::developer(&err).redacted();
        assert_eq!(payload.kind, ErrorKind::Technical);
        assert_eq!(payload.message, REDACTED_TECHNICAL_MESSAGE);
    }

    #[test]
    fn issues_serialize_with_type_tag() {
        let json = serde_json::to_value(Issue::no_entity_was_found("Task")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "no_entity_was_found", "entity": "Task"}));
    }
}
