//! Blocking `Transport` backed by a `ureq` agent.
//!
//! The agent is built with `http_status_as_error(false)` so that non-2xx
//! responses come back as data and are mapped to `TransportError` here, with
//! the HTTP status as the error code. Failures without a response use `-1`.

use std::fmt;

use base64::prelude::*;
use tracing::{debug, warn};
use ureq::http::Response;
use ureq::typestate::WithBody;
use ureq::{Agent, Body, RequestBuilder};
use url::Url;

use crate::error::TransportError;
use crate::http::{merge_headers, HttpMethod, HttpRequest};
use crate::transport::{join_url, normalize_path, Transport, TransportConfig};

/// HTTP transport bound to one endpoint and API key.
#[derive(Clone)]
pub struct UreqTransport {
    endpoint: Url,
    authorization: (String, String),
    default_headers: Vec<(String, String)>,
    agent: Agent,
}

impl UreqTransport {
    pub fn new(endpoint: Url, api_key: &str, default_headers: Vec<(String, String)>) -> Self {
        Self::with_config(endpoint, api_key, default_headers, &TransportConfig::default())
    }

    pub fn with_config(
        endpoint: Url,
        api_key: &str,
        default_headers: Vec<(String, String)>,
        config: &TransportConfig,
    ) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();

        Self {
            endpoint,
            authorization: ("Authorization".to_string(), basic_auth(api_key)),
            default_headers: merge_headers(&[], &default_headers),
            agent,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &[(String, String)],
        body: Option<&str>,
    ) -> Result<Response<Body>, ureq::Error> {
        match method {
            HttpMethod::Get => with_headers(self.agent.get(url), headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), headers).call(),
            HttpMethod::Post => send_body(with_headers(self.agent.post(url), headers), body),
            HttpMethod::Put => send_body(with_headers(self.agent.put(url), headers), body),
            HttpMethod::Patch => send_body(with_headers(self.agent.patch(url), headers), body),
        }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<Option<String>, TransportError> {
        let path = normalize_path(&request.path);
        let url = join_url(&self.endpoint, &request.path)?;
        let headers = merge_headers(
            &merge_headers(&self.default_headers, &request.headers),
            std::slice::from_ref(&self.authorization),
        );

        debug!(method = %request.method, %url, "sending request");
        let mut response = self
            .execute(request.method, url.as_str(), &headers, request.body.as_deref())
            .map_err(|err| {
                warn!(method = %request.method, %url, error = %err, "request failed");
                TransportError::io(err.to_string(), path)
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "received response");
        if !status.is_success() {
            return Err(TransportError::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
                path,
            ));
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| TransportError::io(err.to_string(), path))?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(body))
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

/// `Authorization` value for the API key as username and an empty password.
fn basic_auth(api_key: &str) -> String {
    format!("Basic {}", BASE64_STANDARD.encode(format!("{api_key}:")))
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Without request data no body bytes and no content type go out; ureq
/// still frames a bodyless POST/PUT/PATCH with `content-length: 0`.
fn send_body(builder: RequestBuilder<WithBody>, body: Option<&str>) -> Result<Response<Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
