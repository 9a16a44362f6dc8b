//! Error types for the Ginger API client.
//!
//! # Design
//! Every operation fails with a single `ApiError`. The variant tells the
//! caller which layer gave up:
//!
//! - `Transport`: no usable HTTP response (I/O failure or non-2xx status).
//! - `Decode`: the body was not JSON, or not the shape the operation expects.
//! - `Application`: the body parsed but carries an `error` object, even on a
//!   2xx status.
//! - `Configuration`: the client could not be constructed.
//! - `Serialization`: a request payload could not be encoded.
//!
//! Nothing is retried; the caller owns that decision.

use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Code used by `TransportError` when no HTTP response was obtained.
pub const IO_ERROR_CODE: i32 = -1;

/// Errors returned by `ApiClient` operations and client construction.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be decoded into the expected type.
    #[error("JSON decode failed: {0}")]
    Decode(String),

    /// The server answered with an embedded error object.
    #[error(transparent)]
    Application(#[from] ServerError),

    /// The endpoint passed to the client builder is not usable.
    #[error("invalid client configuration: {0}")]
    Configuration(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Failure reported by a `Transport`.
///
/// `code` is the HTTP status for non-2xx responses and `IO_ERROR_CODE` when
/// the request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP error: {code}: {message} for {path}")]
pub struct TransportError {
    pub code: i32,
    pub message: String,
    pub path: String,
}

impl TransportError {
    pub fn status(code: u16, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code: i32::from(code),
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn io(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code: IO_ERROR_CODE,
            message: message.into(),
            path: path.into(),
        }
    }

    /// True when no HTTP response was obtained.
    pub fn is_io(&self) -> bool {
        self.code == IO_ERROR_CODE
    }
}

/// The `error` object of an API response:
/// `{"error": {"type": "...", "status": "...", "value": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Error)]
#[error("{kind}({status}): {value}")]
pub struct ServerError {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub value: String,
}
