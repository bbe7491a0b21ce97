//! Extracted path parameters and request-side accessors.
//!
//! # Responsibilities
//! - Carry name/value pairs captured from a matched pattern
//! - Preserve the order in which placeholders appear in the pattern
//! - Expose parameters to handlers through request extensions
//!
//! # Design Decisions
//! - Backed by a Vec rather than a HashMap: parameter counts are tiny
//!   and template order is part of the contract
//! - Values are stored as owned Strings so the set can outlive the
//!   request path it was captured from

use axum::http::Request;

/// Parameters captured from the path of a matched request.
///
/// Stored in the request's extensions by the dispatch pipeline, in the
/// order the placeholders appear in the route pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a captured parameter.
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Look up a parameter by name. With several values under one
    /// name, the first is returned.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values stored under a name, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Iterate over parameters in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Convenience accessors for routed requests.
///
/// Implemented for `http::Request` so handlers can read captured path
/// parameters and query parameters without reaching into extensions.
pub trait RequestExt {
    /// Parameters captured by the matched route, if any route matched.
    fn path_params(&self) -> Option<&PathParams>;

    /// A single captured path parameter by name.
    fn param(&self, name: &str) -> Option<&str>;

    /// First query-string parameter with the given name, decoded.
    ///
    /// Path parameters are merged ahead of the original query by the
    /// dispatch pipeline, so a captured parameter shadows a
    /// client-supplied one of the same name.
    fn query_param(&self, name: &str) -> Option<String>;
}

impl<B> RequestExt for Request<B> {
    fn path_params(&self) -> Option<&PathParams> {
        self.extensions().get::<PathParams>()
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.path_params().and_then(|p| p.get(name))
    }

    fn query_param(&self, name: &str) -> Option<String> {
        let query = self.uri().query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}
