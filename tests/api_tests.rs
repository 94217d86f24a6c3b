//! Tests for the REST surface, driven through the router with oneshot
//! requests.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use kaspa_mcp_server::config::Config;
use kaspa_mcp_server::kaspa::KaspaClient;
use kaspa_mcp_server::{api, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use url::Url;

const MAINNET_ADDRESS: &str =
    "kaspa:qpauqsvk7yf9unexwmxsnmg547mhyga37csh0kj53q6xxgl24ydxjsgzthw5j";

fn test_app() -> Router {
    let kaspa = KaspaClient::new(
        Url::parse("http://127.0.0.1:9/").unwrap(),
        Duration::from_secs(1),
    )
    .unwrap();
    let state = AppState {
        config: Config::default(),
        kaspa,
    };
    Router::new().nest("/api", api::router()).with_state(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_returns_ok() {
    let (status, body) = get(test_app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn status_reports_configuration_without_calling_the_node() {
    let (status, body) = get(test_app(), "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["server"], "kaspa-mcp-server");
    assert!(body["kaspa_rpc_url"].as_str().unwrap().contains("127.0.0.1"));
    // No call has been made on this state yet.
    assert_eq!(body["reachable"], Value::Null);
}

#[tokio::test]
async fn address_validation_works_with_the_node_down() {
    let uri = format!("/api/address/{}/validate", MAINNET_ADDRESS);
    let (status, body) = get(test_app(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["validation"]["valid"], true);
    assert_eq!(body["validation"]["network"], "mainnet");
}

#[tokio::test]
async fn malformed_block_hash_is_a_400() {
    let (status, body) = get(test_app(), "/api/block/nothex").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_input");
}

#[tokio::test]
async fn node_info_maps_unreachable_to_502() {
    let (status, body) = get(test_app(), "/api/node/info").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["kind"], "unreachable");
}

#[tokio::test]
async fn empty_utxo_request_is_a_400() {
    let (status, body) = post_json(test_app(), "/api/address/utxos", json!({ "addresses": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_input");
}

#[tokio::test]
async fn empty_mempool_request_is_a_400() {
    let (status, body) = post_json(test_app(), "/api/mempool", json!({ "addresses": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_input");
}

#[tokio::test]
async fn invalid_address_in_balance_path_is_a_400() {
    let (status, body) = get(test_app(), "/api/address/garbage/balance").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_input");
}

#[tokio::test]
async fn rpc_endpoint_forwards_to_the_mcp_dispatcher() {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "initialize",
        "params": {}
    });
    let (status, reply) = post_json(test_app(), "/api/rpc", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["id"], 7);
    assert_eq!(reply["result"]["serverInfo"]["name"], "kaspa-mcp-server");
}

#[tokio::test]
async fn rpc_endpoint_rejects_notifications() {
    let body = json!({
        "jsonrpc": "2.0",
        "id": null,
        "method": "tools/list",
        "params": {}
    });
    let (status, reply) = post_json(test_app(), "/api/rpc", body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(reply["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Notifications"));
}
