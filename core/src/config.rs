//! Building a configured `ApiClient` for a Ginger endpoint.
//!
//! The endpoint is given without the version prefix; `API_VERSION` is
//! appended as a path segment. Every client sends a `User-Agent` naming this
//! crate, its version, and the host platform, unless the caller supplies
//! their own.

use std::time::Duration;

use url::Url;

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::http::merge_headers;
use crate::transport::TransportConfig;
use crate::ureq_transport::UreqTransport;

pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const API_VERSION: &str = "v1";

/// Version of the compiler that built the crate, or the declared
/// `rust-version` when the build script could not read it.
pub const RUSTC_VERSION: &str = match option_env!("VERGEN_RUSTC_SEMVER") {
    Some(version) => version,
    None => env!("CARGO_PKG_RUST_VERSION"),
};

/// `Ginger-Rust/{version} ({os} {arch}, Rust {rustc-version})`.
pub fn user_agent() -> String {
    format!(
        "Ginger-Rust/{CLIENT_VERSION} ({} {}, Rust {RUSTC_VERSION})",
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
}

/// Anything that names an endpoint: a URL string or a parsed `Url`.
pub trait IntoEndpoint {
    fn into_endpoint(self) -> Result<Url>;
}

impl IntoEndpoint for Url {
    fn into_endpoint(self) -> Result<Url> {
        Ok(self)
    }
}

impl IntoEndpoint for &Url {
    fn into_endpoint(self) -> Result<Url> {
        Ok(self.clone())
    }
}

impl IntoEndpoint for &str {
    fn into_endpoint(self) -> Result<Url> {
        Url::parse(self).map_err(|e| ApiError::Configuration(format!("invalid endpoint {self:?}: {e}")))
    }
}

impl IntoEndpoint for &String {
    fn into_endpoint(self) -> Result<Url> {
        self.as_str().into_endpoint()
    }
}

impl IntoEndpoint for String {
    fn into_endpoint(self) -> Result<Url> {
        self.as_str().into_endpoint()
    }
}

/// Configures and builds an `ApiClient` backed by `UreqTransport`.
///
/// ```no_run
/// use std::time::Duration;
/// use ginger_core::ClientBuilder;
///
/// let client = ClientBuilder::new("my-api-key")
///     .default_header("X-Request-Source", "checkout")
///     .timeout(Some(Duration::from_secs(10)))
///     .build("https://api.example.com")?;
/// let issuers = client.get_ideal_issuers()?;
/// # Ok::<(), ginger_core::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: String,
    default_headers: Vec<(String, String)>,
    config: TransportConfig,
}

impl ClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            default_headers: Vec::new(),
            config: TransportConfig::default(),
        }
    }

    /// Add a header sent with every request. Replaces an earlier value for
    /// the same name, including the built-in `User-Agent`.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers = merge_headers(&self.default_headers, &[(name.into(), value.into())]);
        self
    }

    pub fn default_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self = self.default_header(name, value);
        }
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn build(self, endpoint: impl IntoEndpoint) -> Result<ApiClient> {
        let endpoint = versioned_endpoint(endpoint.into_endpoint()?)?;
        let headers = merge_headers(
            &[("User-Agent".to_string(), user_agent())],
            &self.default_headers,
        );
        Ok(ApiClient::new(UreqTransport::with_config(
            endpoint,
            &self.api_key,
            headers,
            &self.config,
        )))
    }
}

/// Create a client for `endpoint` authenticating with `api_key`.
pub fn create_client(endpoint: impl IntoEndpoint, api_key: &str) -> Result<ApiClient> {
    ClientBuilder::new(api_key).build(endpoint)
}

/// Like `create_client`, with extra headers sent on every request.
pub fn create_client_with_headers<K, V>(
    endpoint: impl IntoEndpoint,
    api_key: &str,
    default_headers: impl IntoIterator<Item = (K, V)>,
) -> Result<ApiClient>
where
    K: Into<String>,
    V: Into<String>,
{
    ClientBuilder::new(api_key)
        .default_headers(default_headers)
        .build(endpoint)
}

fn versioned_endpoint(mut endpoint: Url) -> Result<Url> {
    if !matches!(endpoint.scheme(), "http" | "https") || endpoint.host_str().is_none() {
        return Err(ApiError::Configuration(format!(
            "endpoint {endpoint} must be an http(s) URL with a host"
        )));
    }
    endpoint
        .path_segments_mut()
        .map_err(|()| ApiError::Configuration("endpoint cannot be a base URL".to_string()))?
        .pop_if_empty()
        .push(API_VERSION);
    Ok(endpoint)
}
