use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, PoisonError},
};

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{request::Parts, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Issuer {
    pub id: String,
    pub name: String,
    pub list_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_period: Option<String>,
    pub amount: u64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
    pub transactions: Vec<Transaction>,
    #[serde(skip)]
    pub refunded: u64,
}

#[derive(Deserialize)]
pub struct CreateOrder {
    pub amount: u64,
    pub currency: String,
    pub merchant_order_id: Option<String>,
    pub description: Option<String>,
    pub return_url: Option<String>,
    pub webhook_url: Option<String>,
    pub customer: Option<Value>,
    pub extra: Option<Value>,
    #[serde(default)]
    pub transactions: Vec<CreateTransaction>,
}

#[derive(Deserialize)]
pub struct CreateTransaction {
    pub payment_method: String,
    pub payment_method_details: Option<Value>,
    pub expiration_period: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateOrder {
    pub merchant_order_id: Option<String>,
    pub description: Option<String>,
    pub return_url: Option<String>,
    pub webhook_url: Option<String>,
    pub extra: Option<Value>,
}

#[derive(Deserialize)]
pub struct CreateRefund {
    pub amount: u64,
    pub description: Option<String>,
}

/// A request as seen by the server, before routing.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercase.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    fn from_parts(parts: &Parts, body: &[u8]) -> Self {
        Self {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            headers: parts
                .headers
                .iter()
                .map(|(name, value)| {
                    (name.as_str().to_string(), value.to_str().unwrap_or_default().to_string())
                })
                .collect(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A canned response served instead of the routed handler.
#[derive(Clone, Debug)]
pub struct ScriptedResponse {
    pub status: u16,
    pub body: String,
}

impl ScriptedResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

impl IntoResponse for ScriptedResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.body).into_response()
    }
}

/// Shared server state. Cloning gives another handle to the same data, so
/// tests keep one handle while the server runs on another thread.
#[derive(Clone, Default)]
pub struct MockState {
    orders: Arc<RwLock<HashMap<String, Order>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    scripted: Arc<Mutex<VecDeque<ScriptedResponse>>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `response`. Queued responses are served first-in first-out, one
    /// per request, before routing.
    pub fn enqueue(&self, response: ScriptedResponse) {
        self.scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    fn record(&self, request: RecordedRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    fn next_scripted(&self) -> Option<ScriptedResponse> {
        self.scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

/// Error object in the shape the real API uses.
pub struct ApiFailure {
    status: StatusCode,
    kind: &'static str,
    value: String,
}

impl ApiFailure {
    fn not_found(what: &str, id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            kind: "NotFound",
            value: format!("{what} {id} does not exist"),
        }
    }

    fn validation(value: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            kind: "ValidationError",
            value: value.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "type": self.kind,
                "status": self.status.as_u16().to_string(),
                "value": self.value,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

pub fn issuers() -> Vec<Issuer> {
    [
        ("ABNANL2A", "ABN AMRO"),
        ("INGBNL2A", "ING"),
        ("RABONL2U", "Rabobank"),
    ]
    .into_iter()
    .map(|(id, name)| Issuer {
        id: id.to_string(),
        name: name.to_string(),
        list_type: "Nederland".to_string(),
    })
    .collect()
}

pub fn app() -> Router {
    router(MockState::new())
}

/// The API nested under `/v1`, with every request recorded in `state`.
pub fn router(state: MockState) -> Router {
    let api = Router::new()
        .route("/ideal/issuers", get(list_issuers))
        .route("/orders", post(create_order))
        .route("/orders/{id}", get(get_order).put(update_order))
        .route("/orders/{id}/refunds", post(refund_order))
        .route(
            "/orders/{id}/transactions/{transaction_id}/captures/",
            post(capture_transaction),
        );

    Router::new()
        .nest("/v1", api)
        .fallback(unknown_route)
        .layer(middleware::from_fn_with_state(state.clone(), record_and_script))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, MockState::new()).await
}

pub async fn serve(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

async fn record_and_script(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };
    state.record(RecordedRequest::from_parts(&parts, &bytes));

    if let Some(scripted) = state.next_scripted() {
        return scripted.into_response();
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn unknown_route(request: Request) -> ApiFailure {
    ApiFailure::not_found("route", request.uri().path())
}

async fn list_issuers() -> Json<Vec<Issuer>> {
    Json(issuers())
}

async fn create_order(
    State(state): State<MockState>,
    Json(input): Json<CreateOrder>,
) -> Result<(StatusCode, Json<Order>), ApiFailure> {
    if input.amount == 0 {
        return Err(ApiFailure::validation("amount must be greater than zero"));
    }
    if input.currency.len() != 3 || !input.currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ApiFailure::validation(format!(
            "currency {:?} is not an ISO 4217 code",
            input.currency
        )));
    }

    let id = Uuid::new_v4().to_string();
    let transactions: Vec<Transaction> = input
        .transactions
        .into_iter()
        .map(|tx| new_transaction(input.amount, tx))
        .collect();
    let order_url = transactions
        .is_empty()
        .then(|| format!("https://pay.example.com/orders/{id}"));

    let order = Order {
        id: id.clone(),
        amount: input.amount,
        currency: input.currency,
        status: "new".to_string(),
        merchant_order_id: input.merchant_order_id,
        description: input.description,
        return_url: input.return_url,
        webhook_url: input.webhook_url,
        order_url,
        customer: input.customer,
        extra: input.extra,
        transactions,
        refunded: 0,
    };
    state.orders.write().await.insert(id, order.clone());
    Ok((StatusCode::CREATED, Json(order)))
}

fn new_transaction(amount: u64, input: CreateTransaction) -> Transaction {
    let id = Uuid::new_v4().to_string();
    let payment_url = (input.payment_method == "ideal").then(|| format!("https://pay.example.com/ideal/{id}"));
    Transaction {
        id,
        payment_method: input.payment_method,
        payment_method_details: input.payment_method_details,
        expiration_period: input.expiration_period,
        amount,
        status: "new".to_string(),
        payment_url,
    }
}

async fn get_order(State(state): State<MockState>, Path(id): Path<String>) -> Result<Json<Order>, ApiFailure> {
    let orders = state.orders.read().await;
    orders
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("order", &id))
}

async fn update_order(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateOrder>,
) -> Result<Json<Order>, ApiFailure> {
    let mut orders = state.orders.write().await;
    let order = orders.get_mut(&id).ok_or_else(|| ApiFailure::not_found("order", &id))?;
    if let Some(merchant_order_id) = input.merchant_order_id {
        order.merchant_order_id = Some(merchant_order_id);
    }
    if let Some(description) = input.description {
        order.description = Some(description);
    }
    if let Some(return_url) = input.return_url {
        order.return_url = Some(return_url);
    }
    if let Some(webhook_url) = input.webhook_url {
        order.webhook_url = Some(webhook_url);
    }
    if let Some(extra) = input.extra {
        order.extra = Some(extra);
    }
    Ok(Json(order.clone()))
}

async fn refund_order(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(input): Json<CreateRefund>,
) -> Result<(StatusCode, Json<Order>), ApiFailure> {
    let mut orders = state.orders.write().await;
    let order = orders.get_mut(&id).ok_or_else(|| ApiFailure::not_found("order", &id))?;

    let refundable = order.amount - order.refunded;
    if input.amount == 0 || input.amount > refundable {
        return Err(ApiFailure::validation(format!(
            "refund amount {} must be between 1 and {refundable}",
            input.amount
        )));
    }
    order.refunded += input.amount;

    let payment_method = order
        .transactions
        .first()
        .map_or_else(|| "unknown".to_string(), |tx| tx.payment_method.clone());
    let refund = Order {
        id: Uuid::new_v4().to_string(),
        amount: input.amount,
        currency: order.currency.clone(),
        status: "completed".to_string(),
        merchant_order_id: order.merchant_order_id.clone(),
        description: Some(input.description.unwrap_or_else(|| format!("Refund for {id}"))),
        return_url: None,
        webhook_url: None,
        order_url: None,
        customer: order.customer.clone(),
        extra: None,
        transactions: vec![Transaction {
            id: Uuid::new_v4().to_string(),
            payment_method,
            payment_method_details: None,
            expiration_period: None,
            amount: input.amount,
            status: "completed".to_string(),
            payment_url: None,
        }],
        refunded: 0,
    };
    orders.insert(refund.id.clone(), refund.clone());
    Ok((StatusCode::CREATED, Json(refund)))
}

async fn capture_transaction(
    State(state): State<MockState>,
    Path((id, transaction_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiFailure> {
    let mut orders = state.orders.write().await;
    let order = orders.get_mut(&id).ok_or_else(|| ApiFailure::not_found("order", &id))?;
    let transaction = order
        .transactions
        .iter_mut()
        .find(|tx| tx.id == transaction_id)
        .ok_or_else(|| ApiFailure::not_found("transaction", &transaction_id))?;
    transaction.status = "captured".to_string();
    Ok(StatusCode::CREATED)
}
