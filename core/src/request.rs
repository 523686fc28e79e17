//! Declarative description of one outbound call.
//!
//! # Design
//! A `RequestDescriptor` is assembled with consuming builder methods and then
//! handed to `HttpService::send` by reference, so nothing can change it once
//! dispatch starts. Every path segment is optional; an empty segment means
//! "use the service default" (context, version, collection) or "omit".
//!
//! The body type is a generic parameter rather than a pre-serialized value:
//! serialization happens at send time, after the request mutators have run.

use std::fmt;

use crate::http::HttpMethod;
use crate::query::QueryParameters;

#[derive(Debug, Clone)]
pub struct RequestDescriptor<B = ()> {
    method: HttpMethod,
    body: Option<B>,
    application_context: String,
    version: String,
    collection_resource: String,
    collection_item: Option<String>,
    sub_collection_resource: String,
    action_name: String,
    raw_query: String,
    query_parameters: Option<QueryParameters>,
}

impl RequestDescriptor<()> {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            body: None,
            application_context: String::new(),
            version: String::new(),
            collection_resource: String::new(),
            collection_item: None,
            sub_collection_resource: String::new(),
            action_name: String::new(),
            raw_query: String::new(),
            query_parameters: None,
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::new(HttpMethod::Post)
    }

    pub fn put() -> Self {
        Self::new(HttpMethod::Put)
    }

    pub fn patch() -> Self {
        Self::new(HttpMethod::Patch)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }
}

impl<B> RequestDescriptor<B> {
    /// Attach a payload, serialized as JSON when the request is sent.
    pub fn body<C>(self, body: C) -> RequestDescriptor<C> {
        RequestDescriptor {
            method: self.method,
            body: Some(body),
            application_context: self.application_context,
            version: self.version,
            collection_resource: self.collection_resource,
            collection_item: self.collection_item,
            sub_collection_resource: self.sub_collection_resource,
            action_name: self.action_name,
            raw_query: self.raw_query,
            query_parameters: self.query_parameters,
        }
    }

    pub fn application_context(mut self, context: impl Into<String>) -> Self {
        self.application_context = context.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection_resource = collection.into();
        self
    }

    /// Identifier of one item in the collection, rendered through `Display`.
    pub fn item(mut self, id: impl fmt::Display) -> Self {
        self.collection_item = Some(id.to_string());
        self
    }

    pub fn sub_collection(mut self, sub_collection: impl Into<String>) -> Self {
        self.sub_collection_resource = sub_collection.into();
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action_name = action.into();
        self
    }

    /// Pre-formed query fragment, used verbatim ahead of any
    /// [`QueryParameters`].
    pub fn raw_query(mut self, query: impl Into<String>) -> Self {
        self.raw_query = query.into();
        self
    }

    pub fn query(mut self, parameters: QueryParameters) -> Self {
        self.query_parameters = Some(parameters);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn payload(&self) -> Option<&B> {
        self.body.as_ref()
    }

    pub fn application_context_segment(&self) -> &str {
        &self.application_context
    }

    pub fn version_segment(&self) -> &str {
        &self.version
    }

    pub fn collection_segment(&self) -> &str {
        &self.collection_resource
    }

    pub fn item_segment(&self) -> Option<&str> {
        self.collection_item.as_deref()
    }

    pub fn sub_collection_segment(&self) -> &str {
        &self.sub_collection_resource
    }

    pub fn action_segment(&self) -> &str {
        &self.action_name
    }

    pub fn raw_query_fragment(&self) -> &str {
        &self.raw_query
    }

    pub fn query_parameters(&self) -> Option<&QueryParameters> {
        self.query_parameters.as_ref()
    }
}
