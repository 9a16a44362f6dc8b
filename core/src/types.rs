//! Domain DTOs for the Ginger orders API.
//!
//! # Design
//! Response types only name the fields callers commonly read; anything else
//! the API sends is ignored during deserialization. Request payloads skip
//! `None` fields so a partial `OrderUpdate` only touches what it sets.
//! The mock-server crate defines its own copies of these shapes; the
//! integration tests catch any drift between the two.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An iDEAL issuing bank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issuer {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// An order as returned by the API.
///
/// `id`, `amount` and `currency` are required; a response without them fails
/// to decode. Use `ApiClient::send` to read such bodies as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    /// Amount in cents.
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub merchant_order_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Hosted payment page, present when no payment method was chosen.
    #[serde(default)]
    pub order_url: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub extra: Option<Map<String, Value>>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Order {
    /// The payment URL of the first transaction that has one.
    pub fn payment_url(&self) -> Option<&str> {
        self.transactions
            .iter()
            .find_map(|tx| tx.payment_url.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_method_details: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub expiration_period: Option<String>,
}

/// Request payload for `ApiClient::create_order`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    /// Amount in cents.
    pub amount: u64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
    /// Leave empty to let the customer pick a method on the hosted page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<NewTransaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewTransaction {
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_details: Option<Value>,
    /// ISO 8601 duration, e.g. `PT10M`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_period: Option<String>,
}

impl NewTransaction {
    /// An iDEAL transaction for the given issuer.
    pub fn ideal(issuer_id: &str) -> Self {
        Self {
            payment_method: "ideal".to_string(),
            payment_method_details: Some(serde_json::json!({ "issuer_id": issuer_id })),
            expiration_period: None,
        }
    }
}

/// Request payload for `ApiClient::update_order`. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

/// Request payload for `ApiClient::refund_order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Refund {
    /// Amount in cents.
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
