//! Resource operations for the Ginger orders API.
//!
//! # Design
//! `ApiClient` holds only its `Transport` and carries no mutable state
//! between calls. Every operation builds an `HttpRequest`, sends it, and runs
//! the response through `interpret`, which parses the body once and then
//! branches: an `error` object becomes `ApiError::Application`, anything
//! else is converted into the shape the operation expects.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::error::{ApiError, Result, ServerError};
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::Transport;
use crate::types::{Issuer, Order};
use crate::ureq_transport::UreqTransport;

/// Client for the Ginger API, generic over the transport.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// List the banks available for iDEAL payments.
    #[instrument(level = "debug", skip(self))]
    pub fn get_ideal_issuers(&self) -> Result<Vec<Issuer>> {
        decode(self.send(HttpMethod::Get, "/ideal/issuers", None)?)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn get_order(&self, id: &str) -> Result<Order> {
        decode(self.send(HttpMethod::Get, &format!("/orders/{id}"), None)?)
    }

    /// Create an order from a `NewOrder` or any other serializable value.
    ///
    /// The response must decode as an `Order`; `send` returns it untyped.
    #[instrument(level = "debug", skip(self, order))]
    pub fn create_order<B: Serialize + ?Sized>(&self, order: &B) -> Result<Order> {
        let body = encode(order)?;
        decode(self.send(HttpMethod::Post, "/orders", Some(body))?)
    }

    /// Apply a partial update; fields absent from `update` are left alone.
    #[instrument(level = "debug", skip(self, update))]
    pub fn update_order<B: Serialize + ?Sized>(&self, id: &str, update: &B) -> Result<Order> {
        let body = encode(update)?;
        decode(self.send(HttpMethod::Put, &format!("/orders/{id}"), Some(body))?)
    }

    #[instrument(level = "debug", skip(self, refund))]
    pub fn refund_order<B: Serialize + ?Sized>(&self, id: &str, refund: &B) -> Result<Order> {
        let body = encode(refund)?;
        decode(self.send(HttpMethod::Post, &format!("/orders/{id}/refunds"), Some(body))?)
    }

    /// Capture an authorized transaction. The API answers with an empty body.
    #[instrument(level = "debug", skip(self))]
    pub fn capture_order_transaction(&self, order_id: &str, transaction_id: &str) -> Result<()> {
        self.send(
            HttpMethod::Post,
            &format!("/orders/{order_id}/transactions/{transaction_id}/captures/"),
            None,
        )?;
        Ok(())
    }

    /// Send a request to an arbitrary API path.
    ///
    /// `body` must already be JSON; the JSON content type header is added
    /// only when it is present. Returns `None` when the response body is
    /// empty.
    pub fn send(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<Option<Value>> {
        let mut request = HttpRequest::new(method, path);
        if let Some(body) = body {
            request = request.with_json_body(body);
        }
        let response = self.transport.send(&request)?;
        interpret(response)
    }
}

/// Parse a response body and surface an embedded `error` object.
fn interpret(response: Option<String>) -> Result<Option<Value>> {
    let Some(text) = response else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?;
    if let Some(error) = value.get("error") {
        let error = ServerError::deserialize(error)
            .map_err(|e| ApiError::Decode(format!("malformed error object: {e}")))?;
        warn!(kind = %error.kind, status = %error.status, "API returned an error object");
        return Err(ApiError::Application(error));
    }
    Ok(Some(value))
}

fn decode<R: DeserializeOwned>(value: Option<Value>) -> Result<R> {
    let value = value.ok_or_else(|| ApiError::Decode("expected a JSON body, got an empty response".to_string()))?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}
