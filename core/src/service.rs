//! Outbound request dispatch.
//!
//! # Design
//! `HttpService` owns a `Transport`, the `ServiceDefaults` for one resource
//! family, and an ordered list of request mutators. `send` renders the URI,
//! builds an `HttpRequest`, lets every mutator adjust it (headers, auth
//! tokens), attaches the JSON body, and executes it. A non-2xx status is an
//! `ApiError::Status`; the service never swallows it.
//!
//! Mutators are registered during setup. Once the service is shared it is
//! read-only, so `send` takes `&self`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::request::RequestDescriptor;
use crate::response::ResponseWrapper;
use crate::transport::Transport;
use crate::uri::{ServiceDefaults, UriBuilder};

/// A function allowed to alter an in-flight request before it is sent.
pub type RequestMutator = Box<dyn Fn(&mut HttpRequest) + Send + Sync>;

pub struct HttpService<T> {
    transport: T,
    uri: UriBuilder,
    mutators: Vec<RequestMutator>,
}

impl<T: Transport> HttpService<T> {
    pub fn new(transport: T, defaults: ServiceDefaults) -> Self {
        Self {
            transport,
            uri: UriBuilder::new(defaults),
            mutators: Vec::new(),
        }
    }

    /// Register a mutator. Mutators run on every subsequent `send`, in
    /// registration order.
    pub fn add_request_mutator<F>(&mut self, mutator: F) -> &mut Self
    where
        F: Fn(&mut HttpRequest) + Send + Sync + 'static,
    {
        self.mutators.push(Box::new(mutator));
        self
    }

    /// Consuming form of [`add_request_mutator`](Self::add_request_mutator).
    pub fn with_request_mutator<F>(mut self, mutator: F) -> Self
    where
        F: Fn(&mut HttpRequest) + Send + Sync + 'static,
    {
        self.add_request_mutator(mutator);
        self
    }

    pub fn defaults(&self) -> &ServiceDefaults {
        self.uri.defaults()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn request_uri<B>(&self, descriptor: &RequestDescriptor<B>) -> String {
        self.uri.request_uri(descriptor)
    }

    /// Build the transport request without sending it: URI, mutators, then
    /// the JSON body.
    pub fn build_request<B: Serialize>(&self, descriptor: &RequestDescriptor<B>) -> Result<HttpRequest, ApiError> {
        let mut request = HttpRequest::new(descriptor.method(), self.request_uri(descriptor));

        for mutator in &self.mutators {
            mutator(&mut request);
        }

        if let Some(body) = descriptor.payload() {
            let json = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
            request.set_header("content-type", "application/json");
            request.body = Some(json);
        }

        Ok(request)
    }

    pub fn send<B: Serialize>(&self, descriptor: &RequestDescriptor<B>) -> Result<ResponseWrapper, ApiError> {
        let request = self.build_request(descriptor)?;
        let method = request.method;
        let path = request.path.clone();
        tracing::debug!(%method, %path, "sending request");

        let response = self.transport.execute(request)?;
        if !response.is_success() {
            tracing::warn!(%method, %path, status = response.status, "request failed");
            return Err(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }

        tracing::debug!(%method, %path, status = response.status, "request succeeded");
        Ok(ResponseWrapper::new(response))
    }

    pub fn send_and_read<R, B>(&self, descriptor: &RequestDescriptor<B>) -> Result<Option<R>, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        self.send(descriptor)?.read_as()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for HttpService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpService")
            .field("transport", &self.transport)
            .field("defaults", self.uri.defaults())
            .field("mutators", &self.mutators.len())
            .finish()
    }
}
