//! Wire behaviour of `UreqTransport`, checked against the mock server's
//! request recorder and scripted responses.

mod common;

use ginger_core::{create_client_with_headers, HttpMethod, HttpRequest, Transport, UreqTransport};
use mock_server::ScriptedResponse;
use url::Url;

const API_KEY: &str = "1a1b2e63c55e";

fn transport(addr: std::net::SocketAddr, default_headers: &[(&str, &str)]) -> UreqTransport {
    UreqTransport::new(
        Url::parse(&format!("http://{addr}/v1")).unwrap(),
        API_KEY,
        default_headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

#[test]
fn sends_a_request() {
    let (addr, state) = common::spawn_server();
    state.enqueue(ScriptedResponse::ok("not an empty body"));

    let request = HttpRequest {
        method: HttpMethod::Post,
        path: "/foo/bar".to_string(),
        headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
        body: Some("request data".to_string()),
    };
    let response = transport(addr, &[]).send(&request).unwrap();
    assert_eq!(response.as_deref(), Some("not an empty body"));

    let recorded = state.last_request().unwrap();
    assert_eq!(recorded.path, "/v1/foo/bar");
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.body, "request data");
    assert_eq!(recorded.header("Content-Length"), Some("12"));
    assert_eq!(recorded.header("Content-Type"), Some("text/plain"));
    assert_eq!(recorded.header("Authorization"), Some("Basic MWExYjJlNjNjNTVlOg=="));
}

#[test]
fn omits_body_framing_without_request_data() {
    let (addr, state) = common::spawn_server();
    state.enqueue(ScriptedResponse::ok("not an empty body"));
    state.enqueue(ScriptedResponse::ok(""));

    let transport = transport(addr, &[]);
    transport
        .send(&HttpRequest::new(HttpMethod::Get, "/foo/bar"))
        .unwrap();
    transport
        .send(&HttpRequest::new(HttpMethod::Post, "/orders/a/transactions/b/captures/"))
        .unwrap();

    let requests = state.requests();
    assert_eq!(requests.len(), 2);

    let get = &requests[0];
    assert_eq!(get.method, "GET");
    assert!(get.header("Content-Length").is_none());
    assert!(get.header("Content-Type").is_none());

    // A bodyless POST is framed as zero-length, never chunked.
    let post = &requests[1];
    assert_eq!(post.method, "POST");
    assert!(post.body.is_empty());
    assert!(post.header("Content-Type").is_none());
    assert!(post.header("Transfer-Encoding").is_none());
    assert_eq!(post.header("Content-Length").unwrap_or("0"), "0");
}

#[test]
fn sends_default_headers_and_lets_the_request_override_them() {
    let (addr, state) = common::spawn_server();
    state.enqueue(ScriptedResponse::ok("{}"));

    let mut request = HttpRequest::new(HttpMethod::Get, "/foo/bar");
    request.headers.push(("x-override".to_string(), "per-call".to_string()));
    transport(addr, &[("X-Custom-Header", "foobar"), ("X-Override", "default")])
        .send(&request)
        .unwrap();

    let recorded = state.last_request().unwrap();
    assert_eq!(recorded.header("X-Custom-Header"), Some("foobar"));
    assert_eq!(recorded.header("X-Override"), Some("per-call"));
    assert_eq!(
        recorded
            .headers
            .iter()
            .filter(|(name, _)| name == "x-override")
            .count(),
        1
    );
}

#[test]
fn returns_none_on_empty_response_body() {
    let (addr, state) = common::spawn_server();
    state.enqueue(ScriptedResponse::ok(""));

    let response = transport(addr, &[])
        .send(&HttpRequest::new(HttpMethod::Get, "/empty/response"))
        .unwrap();
    assert!(response.is_none());
}

#[test]
fn leading_slash_does_not_change_the_request_path() {
    let (addr, state) = common::spawn_server();
    state.enqueue(ScriptedResponse::ok("{}"));
    state.enqueue(ScriptedResponse::ok("{}"));

    let transport = transport(addr, &[]);
    transport
        .send(&HttpRequest::new(HttpMethod::Get, "/orders/123"))
        .unwrap();
    transport
        .send(&HttpRequest::new(HttpMethod::Get, "orders/123"))
        .unwrap();

    let requests = state.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/v1/orders/123");
    assert_eq!(requests[0].path, requests[1].path);
}

#[test]
fn non_success_status_is_reported_with_code_and_path() {
    let (addr, state) = common::spawn_server();
    state.enqueue(ScriptedResponse::with_status(503, "{\"ignored\":true}"));

    let err = transport(addr, &[])
        .send(&HttpRequest::new(HttpMethod::Get, "/ideal/issuers"))
        .unwrap_err();
    assert_eq!(err.code, 503);
    assert_eq!(err.message, "Service Unavailable");
    assert_eq!(err.path, "ideal/issuers");
    assert_eq!(err.to_string(), "HTTP error: 503: Service Unavailable for ideal/issuers");
}

#[test]
fn io_failure_uses_sentinel_code() {
    let addr = common::closed_port();
    let err = transport(addr, &[])
        .send(&HttpRequest::new(HttpMethod::Get, "/error"))
        .unwrap_err();
    assert_eq!(err.code, -1);
    assert_eq!(err.path, "error");
}

#[test]
fn configured_client_sends_user_agent_and_custom_headers() {
    let (addr, state) = common::spawn_server();
    let client = create_client_with_headers(
        format!("http://{addr}"),
        API_KEY,
        [("X-Custom-Header", "foobar")],
    )
    .unwrap();

    client.get_ideal_issuers().unwrap();

    let recorded = state.last_request().unwrap();
    assert_eq!(recorded.path, "/v1/ideal/issuers");
    assert_eq!(recorded.header("X-Custom-Header"), Some("foobar"));
    assert!(recorded.header("User-Agent").unwrap().starts_with("Ginger-Rust/"));
    assert_eq!(recorded.header("Authorization"), Some("Basic MWExYjJlNjNjNTVlOg=="));
}
