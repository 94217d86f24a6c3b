//! Tests for the MCP dispatcher: routing, schema rejection before any
//! network I/O, and the result-envelope contract (tool failures are
//! payloads, not JSON-RPC errors).

use std::time::Duration;

use kaspa_mcp_server::config::Config;
use kaspa_mcp_server::kaspa::KaspaClient;
use kaspa_mcp_server::mcp::handler::{handle_mcp_request, TOOL_NAMES};
use kaspa_mcp_server::mcp::protocol::{error_codes, Request};
use kaspa_mcp_server::AppState;
use serde_json::{json, Value};
use url::Url;

const MAINNET_ADDRESS: &str =
    "kaspa:qpauqsvk7yf9unexwmxsnmg547mhyga37csh0kj53q6xxgl24ydxjsgzthw5j";

/// State whose gateway points at a dead endpoint: anything that reaches
/// the network fails with `unreachable`, anything pure still works.
fn offline_state() -> AppState {
    let kaspa = KaspaClient::new(
        Url::parse("http://127.0.0.1:9/").unwrap(),
        Duration::from_secs(1),
    )
    .unwrap();
    AppState {
        config: Config::default(),
        kaspa,
    }
}

fn request(method: &str, params: Value) -> Request {
    Request {
        jsonrpc: "2.0".to_string(),
        id: json!(1),
        method: method.to_string(),
        params: Some(params),
    }
}

/// Run a tools/call and return the result payload. Asserts the protocol
/// invariant: a well-formed tools/call always answers with `result`.
async fn call_tool(state: AppState, name: &str, args: Value) -> Value {
    let req = request("tools/call", json!({ "name": name, "arguments": args }));
    let resp = handle_mcp_request(req, state).await.expect("a response");
    assert!(
        resp.error.is_none(),
        "tools/call must not fail at the protocol layer: {:?}",
        resp.error
    );
    resp.result.expect("a result payload")
}

#[tokio::test]
async fn initialize_reports_server_identity_and_capabilities() {
    let resp = handle_mcp_request(request("initialize", json!({})), offline_state())
        .await
        .unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], "kaspa-mcp-server");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["capabilities"]["resources"].is_object());
}

#[tokio::test]
async fn tools_list_declares_all_eight_tools_with_schemas() {
    let resp = handle_mcp_request(request("tools/list", json!({})), offline_state())
        .await
        .unwrap();
    let result = resp.result.unwrap();
    let tools = result["tools"].as_array().unwrap();
    assert_eq!(tools.len(), TOOL_NAMES.len());

    for name in TOOL_NAMES {
        let tool = tools
            .iter()
            .find(|t| t["name"] == name)
            .unwrap_or_else(|| panic!("missing tool {}", name));
        assert!(tool["inputSchema"]["type"] == "object");
        assert!(tool["description"].as_str().unwrap().len() > 0);
    }
}

#[tokio::test]
async fn validate_address_succeeds_with_the_node_down() {
    let payload = call_tool(
        offline_state(),
        "validate_address",
        json!({ "address": MAINNET_ADDRESS }),
    )
    .await;
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["validation"]["valid"], true);
    assert_eq!(payload["validation"]["network"], "mainnet");
}

#[tokio::test]
async fn validate_address_reports_invalid_as_a_success_payload() {
    let payload = call_tool(
        offline_state(),
        "validate_address",
        json!({ "address": "kaspa:nope" }),
    )
    .await;
    // A malformed address is a *finding*, not a tool failure.
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["validation"]["valid"], false);
    assert!(payload["validation"]["reason"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn malformed_block_hash_is_invalid_input_without_touching_the_node() {
    let payload = call_tool(
        offline_state(),
        "get_block_by_hash",
        json!({ "block_hash": "zz" }),
    )
    .await;
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error"]["kind"], "invalid_input");
}

#[tokio::test]
async fn missing_required_argument_names_the_field() {
    let payload = call_tool(offline_state(), "get_block_by_hash", json!({})).await;
    assert_eq!(payload["error"]["kind"], "invalid_input");
    assert!(payload["error"]["message"]
        .as_str()
        .unwrap()
        .contains("block_hash"));
}

#[tokio::test]
async fn unknown_tool_is_a_not_found_payload_not_a_protocol_error() {
    let payload = call_tool(offline_state(), "mine_block", json!({})).await;
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error"]["kind"], "not_found");
}

#[tokio::test]
async fn empty_address_lists_are_rejected_locally() {
    for tool in ["get_address_utxos", "get_mempool_transactions"] {
        let payload = call_tool(offline_state(), tool, json!({ "addresses": [] })).await;
        assert_eq!(payload["status"], "error", "tool: {}", tool);
        assert_eq!(payload["error"]["kind"], "invalid_input", "tool: {}", tool);
    }
}

#[tokio::test]
async fn utxo_address_list_over_the_limit_is_invalid_input() {
    let addresses: Vec<&str> = std::iter::repeat(MAINNET_ADDRESS).take(101).collect();
    let payload = call_tool(
        offline_state(),
        "get_address_utxos",
        json!({ "addresses": addresses }),
    )
    .await;
    assert_eq!(payload["error"]["kind"], "invalid_input");
}

#[tokio::test]
async fn network_tools_surface_unreachable_when_the_node_is_down() {
    let payload = call_tool(offline_state(), "get_node_info", json!({})).await;
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error"]["kind"], "unreachable");
    assert!(payload["content"][0]["text"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn bare_tool_names_are_accepted_as_methods() {
    let resp = handle_mcp_request(request("get_latest_daa", json!({})), offline_state())
        .await
        .unwrap();
    assert!(resp.error.is_none());
    let payload = resp.result.unwrap();
    // Endpoint is down, but the alias was routed into tools/call.
    assert_eq!(payload["error"]["kind"], "unreachable");
}

#[tokio::test]
async fn unknown_methods_are_protocol_errors() {
    let resp = handle_mcp_request(request("blocks/subscribe", json!({})), offline_state())
        .await
        .unwrap();
    let error = resp.error.expect("protocol error");
    assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn notifications_get_no_response() {
    let req = Request {
        jsonrpc: "2.0".to_string(),
        id: Value::Null,
        method: "tools/list".to_string(),
        params: None,
    };
    assert!(handle_mcp_request(req, offline_state()).await.is_none());
}

#[tokio::test]
async fn resources_are_listed_and_readable_offline() {
    let state = offline_state();

    let resp = handle_mcp_request(request("resources/list", json!({})), state.clone())
        .await
        .unwrap();
    let result = resp.result.unwrap();
    let uris: Vec<&str> = result["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["uri"].as_str().unwrap())
        .collect();
    assert!(uris.contains(&"kaspa://status"));
    assert!(uris.contains(&"kaspa://docs/examples"));

    // Status reads only the cached flag, so it must work with the node
    // down and must report the unknown state before any call was made.
    let resp = handle_mcp_request(
        request("resources/read", json!({ "uri": "kaspa://status" })),
        state,
    )
    .await
    .unwrap();
    let result = resp.result.unwrap();
    let text = result["contents"][0]["text"].as_str().unwrap();
    assert!(text.contains("Node reachable"));
    assert!(text.contains("unknown"));
}

#[tokio::test]
async fn status_resource_reflects_a_failed_call() {
    let state = offline_state();

    // Trip the gateway once so the cached flag flips to "no".
    let _ = call_tool(state.clone(), "get_node_info", json!({})).await;

    let resp = handle_mcp_request(
        request("resources/read", json!({ "uri": "kaspa://status" })),
        state,
    )
    .await
    .unwrap();
    let text = resp.result.unwrap()["contents"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(text.contains("**Node reachable**: no"));
}

#[tokio::test]
async fn unknown_resource_uri_is_rejected() {
    let resp = handle_mcp_request(
        request("resources/read", json!({ "uri": "kaspa://nope" })),
        offline_state(),
    )
    .await
    .unwrap();
    assert_eq!(resp.error.unwrap().code, error_codes::INVALID_PARAMS);
}
