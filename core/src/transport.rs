//! The seam between `HttpService` and the network.
//!
//! `HttpService` only ever sees the `Transport` trait. `UreqTransport` is the
//! blocking implementation used by hosts that have no HTTP stack of their
//! own; tests substitute in-memory transports.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one request and returns the buffered response.
///
/// Implementations resolve the relative request path against their own base
/// address. Non-2xx statuses are returned as data, not as `Err`; only a
/// failed round-trip is an error.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Response bodies larger than this are rejected unless raised with
/// [`UreqTransport::with_max_response_bytes`].
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

/// Blocking transport over `ureq`.
///
/// Response bodies are buffered in full, up to `max_response_bytes`; a longer
/// body fails the round-trip with `ApiError::Transport`.
#[derive(Clone)]
pub struct UreqTransport {
    base_url: String,
    agent: ureq::Agent,
    max_response_bytes: u64,
}

impl UreqTransport {
    pub fn new(base_url: &str) -> Self {
        // Status interpretation belongs to HttpService, so 4xx/5xx come back
        // as data.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    pub fn with_max_response_bytes(mut self, limit: u64) -> Self {
        self.max_response_bytes = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_response_bytes(&self) -> u64 {
        self.max_response_bytes
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("base_url", &self.base_url)
            .field("max_response_bytes", &self.max_response_bytes)
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.url(&request.path);
        let HttpRequest {
            method,
            headers,
            body,
            ..
        } = request;

        let result = match method {
            HttpMethod::Get => send_without_body(without_body(self.agent.get(&url), &headers), body),
            HttpMethod::Delete => send_without_body(without_body(self.agent.delete(&url), &headers), body),
            HttpMethod::Post => send_with_body(with_body(self.agent.post(&url), &headers), body),
            HttpMethod::Put => send_with_body(with_body(self.agent.put(&url), &headers), body),
            HttpMethod::Patch => send_with_body(with_body(self.agent.patch(&url), &headers), body),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_response_bytes)
            .read_to_string()
            .map_err(|e| {
                ApiError::Transport(format!(
                    "reading response body (limit {} bytes): {e}",
                    self.max_response_bytes
                ))
            })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn without_body(
    mut builder: ureq::RequestBuilder<ureq::typestate::WithoutBody>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<ureq::typestate::WithoutBody> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn with_body(
    mut builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<ureq::typestate::WithBody> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

// GET and DELETE only carry a payload when the descriptor has one.
fn send_without_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithoutBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.force_send_body().send(body.as_bytes()),
        None => builder.call(),
    }
}

fn send_with_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
