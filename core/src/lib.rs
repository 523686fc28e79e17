//! REST request construction, dispatch and handler error classification.
//!
//! # Overview
//! Outbound: a `RequestDescriptor` names the resource path segments, query
//! and body of one call. `HttpService` renders it into a relative URI against
//! its `ServiceDefaults`, runs the registered request mutators, and executes
//! it through a `Transport`. The response comes back as a `ResponseWrapper`
//! for typed reads.
//!
//! Inbound: `ErrorDispatch` wraps handler execution and maps failures to an
//! `Outcome` (value, no content, not found, or a classified error payload)
//! according to a `HandlingMode`, propagating whatever the mode leaves to the
//! host's global handler.
//!
//! # Design
//! - Host-does-IO: the core builds and parses plain-data `HttpRequest` /
//!   `HttpResponse` values. `UreqTransport` is the stock blocking transport.
//! - Errors are tagged values (`ErrorKind` + `Issue`s), classified with
//!   `match`, never by type inspection.
//! - The production flag is an explicit `Environment`, not global state.

pub mod actions;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod http;
pub mod query;
pub mod request;
pub mod response;
pub mod select_list;
pub mod service;
pub mod transport;
pub mod uri;

pub use dispatch::{Environment, ErrorDispatch, HandlingMode, Outcome};
pub use domain::{DeveloperDetail, DomainError, ErrorKind, ErrorPayload, HandlerError, Issue};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::QueryParameters;
pub use request::RequestDescriptor;
pub use response::ResponseWrapper;
pub use select_list::{to_select_list, SelectItem};
pub use service::{HttpService, RequestMutator};
pub use transport::{Transport, UreqTransport};
pub use uri::{finalize_segment, normalize_segment, ServiceDefaults, UriBuilder};
