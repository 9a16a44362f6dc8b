//! Synchronous client for the Ginger payments API.
//!
//! # Overview
//! Two layers. A `Transport` sends a method/path/headers/body tuple to the
//! configured endpoint and returns the body text or a `TransportError`.
//! `ApiClient` sits on top: it knows the order, refund, capture, and issuer
//! operations, encodes request bodies as JSON, and decodes responses into
//! the DTOs in `types`.
//!
//! # Design
//! - `ApiClient` is immutable after construction and holds only its
//!   transport, so one instance can serve many threads.
//! - Each operation is exactly one blocking round trip. Nothing is queued,
//!   cached, or retried.
//! - A response carrying `{"error": {...}}` fails with
//!   `ApiError::Application` even when the HTTP status is 2xx.
//!
//! ```no_run
//! use ginger_core::{create_client, NewOrder, NewTransaction};
//!
//! let client = create_client("https://api.example.com", "my-api-key")?;
//! let order = client.create_order(&NewOrder {
//!     amount: 250,
//!     currency: "EUR".to_string(),
//!     transactions: vec![NewTransaction::ideal("BANKNL2Y")],
//!     ..NewOrder::default()
//! })?;
//! println!("Payment URL: {:?}", order.payment_url());
//! # Ok::<(), ginger_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
pub mod ureq_transport;

pub use client::ApiClient;
pub use config::{
    create_client, create_client_with_headers, ClientBuilder, IntoEndpoint, API_VERSION, CLIENT_VERSION,
    RUSTC_VERSION,
};
pub use error::{ApiError, Result, ServerError, TransportError};
pub use http::{HttpMethod, HttpRequest};
pub use transport::{Transport, TransportConfig};
pub use types::{Customer, Issuer, NewOrder, NewTransaction, Order, OrderUpdate, Refund, Transaction};
pub use ureq_transport::UreqTransport;
