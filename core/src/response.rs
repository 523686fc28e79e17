//! Typed access to a successful response.
//!
//! # Design
//! The transport hands back a fully buffered body, so `read_as` can be called
//! any number of times; each call deserializes the same bytes again. An empty
//! body is "no value" (`Ok(None)`), not a deserialization failure.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::HttpResponse;

#[derive(Debug, Clone)]
pub struct ResponseWrapper {
    inner: HttpResponse,
}

impl ResponseWrapper {
    pub fn new(inner: HttpResponse) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> u16 {
        self.inner.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.inner.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.header(name)
    }

    pub fn content(&self) -> &str {
        &self.inner.body
    }

    pub fn read_as<T: DeserializeOwned>(&self) -> Result<Option<T>, ApiError> {
        let content = self.inner.body.trim();
        if content.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(content)
            .map(Some)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn into_inner(self) -> HttpResponse {
        self.inner
    }
}

impl From<HttpResponse> for ResponseWrapper {
    fn from(inner: HttpResponse) -> Self {
        Self::new(inner)
    }
}
