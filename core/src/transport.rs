//! The seam between the domain client and the network.
//!
//! # Design
//! `ApiClient` only needs "send this request, give me the body or an error".
//! `Transport` captures exactly that, so the production `UreqTransport` and
//! in-memory test transports are interchangeable. Transports know nothing
//! about JSON or the payment domain.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::TransportError;
use crate::http::HttpRequest;

/// Sends a request to the configured endpoint.
///
/// Implementations return `Ok(None)` for a successful response with an empty
/// body and fail with `TransportError` for non-2xx statuses or I/O failures.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<Option<String>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<Option<String>, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<Option<String>, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<Option<String>, TransportError> {
        (**self).send(request)
    }
}

/// Settings for the HTTP agent behind `UreqTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Upper bound for a whole request. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Strip exactly one leading slash.
pub fn normalize_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Append `path` to the path segments of `endpoint`.
///
/// The endpoint path is never replaced: `https://api.example.com/v1` joined
/// with `/orders/1` gives `https://api.example.com/v1/orders/1`.
pub fn join_url(endpoint: &Url, path: &str) -> Result<Url, TransportError> {
    let relative = normalize_path(path);
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| TransportError::io(format!("endpoint {endpoint} cannot be a base URL"), relative))?
        .pop_if_empty()
        .extend(relative.split('/'));
    Ok(url)
}
