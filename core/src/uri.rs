//! Request URI assembly.
//!
//! Paths follow `/context/version/collection/{id}/sub/action/{id}`: every
//! level may be overridden per call or fall back to the service defaults,
//! and the item identifier is written exactly once, after the action when an
//! action is present and after the collection otherwise.

use crate::request::RequestDescriptor;

/// Per-service fallbacks for the leading path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDefaults {
    pub application_context: String,
    pub version: String,
    pub collection_resource: String,
}

impl ServiceDefaults {
    pub fn new() -> Self {
        Self::default()
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
}

/// Trim whitespace, then strip every leading and trailing `/`.
pub fn normalize_segment(segment: &str) -> &str {
    segment.trim().trim_start_matches('/').trim_end_matches('/')
}

/// `"/"` followed by the normalized segment.
pub fn finalize_segment(segment: &str) -> String {
    format!("/{}", normalize_segment(segment))
}

/// Renders request descriptors into relative request URIs.
#[derive(Debug, Clone, Default)]
pub struct UriBuilder {
    defaults: ServiceDefaults,
}

impl UriBuilder {
    pub fn new(defaults: ServiceDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ServiceDefaults {
        &self.defaults
    }

    pub fn request_uri<B>(&self, descriptor: &RequestDescriptor<B>) -> String {
        let mut path = String::new();

        let context = or_default(descriptor.application_context_segment(), &self.defaults.application_context);
        push_segment(&mut path, context);

        let version = or_default(descriptor.version_segment(), &self.defaults.version);
        push_segment(&mut path, version);

        let item = descriptor.item_segment().map(normalize_segment).unwrap_or("");
        let action = normalize_segment(descriptor.action_segment());

        let collection = or_default(descriptor.collection_segment(), &self.defaults.collection_resource);
        if !collection.is_empty() {
            push_segment(&mut path, collection);
            if action.is_empty() {
                push_segment(&mut path, item);
            }
        }

        push_segment(&mut path, normalize_segment(descriptor.sub_collection_segment()));

        if !action.is_empty() {
            push_segment(&mut path, action);
            push_segment(&mut path, item);
        }

        path.push_str(&query_fragment(descriptor));
        path
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    match normalize_segment(value) {
        "" => normalize_segment(default),
        value => value,
    }
}

fn push_segment(path: &mut String, segment: &str) {
    if !segment.is_empty() {
        path.push('/');
        path.push_str(segment);
    }
}

fn query_fragment<B>(descriptor: &RequestDescriptor<B>) -> String {
    let mut fragment = descriptor.raw_query_fragment().to_string();
    if let Some(parameters) = descriptor.query_parameters() {
        fragment.push_str(&parameters.render());
    }
    if fragment.is_empty() || fragment.trim_start().starts_with('?') {
        fragment
    } else {
        format!("?{fragment}")
    }
}
