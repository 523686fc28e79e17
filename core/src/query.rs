//! Query-string accumulator.
//!
//! Parameters keep the order in which each name was first added; re-adding a
//! name overwrites its value in place. Keys and values are percent-encoded
//! with the RFC 3986 unreserved set, so a space becomes `%20` (not `+`).

use std::fmt;

/// Ordered, de-duplicated query parameters for an outbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    params: Vec<(String, String)>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update `name` with the `Display` form of `value`.
    pub fn add(&mut self, name: impl Into<String>, value: impl fmt::Display) -> &mut Self {
        let name = name.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    /// Like [`add`](Self::add), but a `None` value leaves the parameters
    /// untouched: it neither adds nor clears `name`.
    pub fn add_opt<V: fmt::Display>(&mut self, name: impl Into<String>, value: Option<V>) -> &mut Self {
        match value {
            Some(value) => self.add(name, value),
            None => self,
        }
    }

    /// Consuming form of [`add`](Self::add) for building parameters inline.
    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.add(name, value);
        self
    }

    /// Consuming form of [`add_opt`](Self::add_opt).
    pub fn with_opt<V: fmt::Display>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.add_opt(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render as `k1=v1&k2=v2`. Empty parameters render as `""`.
    pub fn render(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| format!("{}={}", urlencoding::encode(name), urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for QueryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
