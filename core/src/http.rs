//! HTTP request types shared by the domain client and the transports.
//!
//! # Design
//! Requests are described as plain data. `ApiClient` builds an `HttpRequest`
//! for every operation and hands it to a `Transport`, which owns the actual
//! I/O. Tests substitute their own `Transport` and inspect the request
//! values directly.
//!
//! Header lists are `Vec<(String, String)>` with unique, case-insensitive
//! names. `merge_headers` is the only place that combines two lists.

use std::fmt;

/// Media type sent with every request body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `path` is relative to the configured endpoint. A leading slash is
/// optional; the transport normalizes it before joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A request without headers or body.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach a JSON body together with its content type header.
    pub fn with_json_body(mut self, body: String) -> Self {
        self.headers = merge_headers(
            &self.headers,
            &[("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())],
        );
        self.body = Some(body);
        self
    }

    /// Look up a header value by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Look up a header value by name, ignoring case.
pub fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Combine `defaults` with `overrides`. A header present in both lists keeps
/// the position it had in `defaults` and takes the value from `overrides`.
pub fn merge_headers(
    defaults: &[(String, String)],
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::with_capacity(defaults.len() + overrides.len());
    for (key, value) in defaults.iter().chain(overrides) {
        match merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(existing) => existing.1 = value.clone(),
            None => merged.push((key.clone(), value.clone())),
        }
    }
    merged
}
