//! # MCP Handler Module
//!
//! Dispatcher for incoming MCP requests: routes JSON-RPC methods, holds
//! the static tool table, validates tool arguments, and turns gateway
//! outcomes into result payloads.
//!
//! ## Supported Tools
//!
//! ### Node Queries
//! - `get_node_info` - Node version, sync state and mempool size
//! - `get_latest_daa` - Latest DAA score (virtual selected parent blue score)
//! - `get_block_dag_info` - BlockDAG tips, difficulty, virtual DAA score
//!
//! ### Block Queries
//! - `get_block_by_hash` - Block header (and optionally transactions) by hash
//!
//! ### Address Queries
//! - `validate_address` - Local address format check, no network I/O
//! - `get_address_balance` - Balance in sompi for one address
//! - `get_address_utxos` - Unspent outputs for up to 100 addresses
//! - `get_mempool_transactions` - Pending transactions touching addresses
//!
//! Tool failures are result payloads with `status: "error"` and an error
//! kind; the JSON-RPC layer answers `result` for every well-formed
//! `tools/call` so the protocol framing itself never fails with the tool.

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::kaspa::{validate_address, ToolError};
use crate::mcp::protocol::{error_codes, Request, Response};
use crate::mcp::resources;
use crate::utils::{optional_arg, required_arg};
use crate::{AppState, SERVER_NAME, SERVER_VERSION};

/// Stable tool names, in registration order.
pub const TOOL_NAMES: [&str; 8] = [
    "get_node_info",
    "get_block_by_hash",
    "get_latest_daa",
    "get_block_dag_info",
    "validate_address",
    "get_address_balance",
    "get_address_utxos",
    "get_mempool_transactions",
];

/// One tool invocation, parsed and validated from the raw `name` +
/// `arguments` pair before any gateway call is made.
#[derive(Debug)]
enum ToolRequest {
    GetNodeInfo,
    GetBlockByHash {
        block_hash: String,
        include_transactions: bool,
    },
    GetLatestDaa,
    GetBlockDagInfo,
    ValidateAddress {
        address: String,
    },
    GetAddressBalance {
        address: String,
    },
    GetAddressUtxos {
        addresses: Vec<String>,
    },
    GetMempoolTransactions {
        addresses: Vec<String>,
        include_orphan_pool: bool,
    },
}

impl ToolRequest {
    fn parse(name: &str, args: &Value) -> Result<Self, ToolError> {
        match name {
            "get_node_info" => Ok(Self::GetNodeInfo),
            "get_block_by_hash" => Ok(Self::GetBlockByHash {
                block_hash: required_arg(args, "block_hash")?,
                include_transactions: optional_arg(args, "include_transactions")?.unwrap_or(false),
            }),
            "get_latest_daa" => Ok(Self::GetLatestDaa),
            "get_block_dag_info" => Ok(Self::GetBlockDagInfo),
            "validate_address" => Ok(Self::ValidateAddress {
                address: required_arg(args, "address")?,
            }),
            "get_address_balance" => Ok(Self::GetAddressBalance {
                address: required_arg(args, "address")?,
            }),
            "get_address_utxos" => Ok(Self::GetAddressUtxos {
                addresses: required_arg(args, "addresses")?,
            }),
            "get_mempool_transactions" => Ok(Self::GetMempoolTransactions {
                addresses: required_arg(args, "addresses")?,
                include_orphan_pool: optional_arg(args, "include_orphan_pool")?.unwrap_or(true),
            }),
            other => Err(ToolError::not_found(format!("unknown tool: {}", other))),
        }
    }
}

/// Main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    if req.is_notification() {
        return None;
    }

    let invocation = Uuid::new_v4();
    let span = tracing::info_span!("mcp_request", method = %req.method, %invocation);

    let response = async {
        info!("handling MCP request");
        match req.method.as_str() {
            "initialize" => handle_initialize(&req),
            "tools/list" => handle_tools_list(&req),
            "tools/call" => handle_tool_call(req, state).await,
            "resources/list" => handle_resources_list(&req),
            "resources/read" => handle_resource_read(&req, &state).await,
            // Each tool name is also accepted as a bare method and
            // rewritten into tools/call so CLI clients can skip the
            // envelope.
            name if TOOL_NAMES.contains(&name) => {
                let wrapped = Request {
                    jsonrpc: req.jsonrpc.clone(),
                    id: req.id.clone(),
                    method: "tools/call".to_string(),
                    params: Some(json!({
                        "name": name,
                        "arguments": req.params.clone().unwrap_or_else(|| json!({})),
                    })),
                };
                handle_tool_call(wrapped, state).await
            }
            _ => Response::error(
                req.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", req.method),
            ),
        }
    }
    .instrument(span)
    .await;

    Some(response)
}

/// Handles a 'tools/call' request: parse, validate, invoke, wrap.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);

    let outcome = match ToolRequest::parse(tool_name, args) {
        Ok(request) => execute_tool(request, &state).await,
        Err(err) => Err(err),
    };

    let payload = match outcome {
        Ok((summary, payload)) => success_payload(summary, payload),
        Err(err) => {
            warn!(tool = tool_name, kind = %err.kind, "tool call failed: {}", err.message);
            error_payload(&err)
        }
    };

    Response::success(req.id, payload)
}

/// Run one validated tool request against the gateway. Returns a short
/// human summary plus the structured payload fields.
async fn execute_tool(request: ToolRequest, state: &AppState) -> Result<(String, Value), ToolError> {
    let kaspa = &state.kaspa;
    match request {
        ToolRequest::GetNodeInfo => {
            let info = kaspa.get_node_info().await?;
            let summary = format!(
                "Kaspad {} (synced: {}, mempool: {})",
                info.server_version, info.is_synced, info.mempool_size
            );
            Ok((summary, json!({ "node_info": info })))
        }
        ToolRequest::GetBlockByHash {
            block_hash,
            include_transactions,
        } => {
            let block = kaspa
                .get_block_by_hash(&block_hash, include_transactions)
                .await?;
            let summary = format!("Block {}", block_hash);
            Ok((summary, json!({ "block_hash": block_hash, "block": block })))
        }
        ToolRequest::GetLatestDaa => {
            let blue_score = kaspa.get_latest_daa_score().await?;
            let summary = format!("Latest DAA score: {}", blue_score);
            Ok((summary, json!({ "blue_score": blue_score })))
        }
        ToolRequest::GetBlockDagInfo => {
            let dag_info = kaspa.get_block_dag_info().await?;
            let summary = format!(
                "BlockDAG {} at virtual DAA score {}",
                dag_info.network_name, dag_info.virtual_daa_score
            );
            Ok((summary, json!({ "dag_info": dag_info })))
        }
        ToolRequest::ValidateAddress { address } => {
            let check = validate_address(&address);
            let summary = if check.is_valid() {
                format!("Address is valid: {}", address)
            } else {
                format!("Address is invalid: {}", address)
            };
            Ok((summary, json!({ "validation": check.to_json() })))
        }
        ToolRequest::GetAddressBalance { address } => {
            let balance = kaspa.get_address_balance(&address).await?;
            let summary = format!("Balance: {} sompi", balance.balance);
            Ok((
                summary,
                json!({ "address": balance.address, "balance": balance.balance }),
            ))
        }
        ToolRequest::GetAddressUtxos { addresses } => {
            let utxos = kaspa.get_address_utxos(&addresses).await?;
            let summary = format!(
                "{} UTXO entries across {} address(es)",
                utxos.len(),
                addresses.len()
            );
            Ok((summary, json!({ "addresses": addresses, "utxos": utxos })))
        }
        ToolRequest::GetMempoolTransactions {
            addresses,
            include_orphan_pool,
        } => {
            let entries = kaspa
                .get_mempool_transactions(&addresses, include_orphan_pool)
                .await?;
            let summary = format!("Mempool entries for {} address(es)", addresses.len());
            Ok((
                summary,
                json!({ "addresses": addresses, "mempool_transactions": entries }),
            ))
        }
    }
}

/// Result payload for a successful tool call: the structured fields plus
/// a text content block so every MCP client has something to render.
fn success_payload(summary: String, payload: Value) -> Value {
    let mut map = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".into(), other);
            map
        }
    };
    map.insert("status".into(), json!("success"));
    map.insert("timestamp".into(), json!(Utc::now().to_rfc3339()));
    if !map.contains_key("content") {
        map.insert("content".into(), json!([{ "type": "text", "text": summary }]));
    }
    Value::Object(map)
}

/// Result payload for a failed tool call. Still a JSON-RPC `result`: the
/// protocol framing succeeds even when the tool does not.
fn error_payload(err: &ToolError) -> Value {
    json!({
        "status": "error",
        "isError": true,
        "error": { "kind": err.kind, "message": err.message },
        "timestamp": Utc::now().to_rfc3339(),
        "content": [{ "type": "text", "text": err.to_string() }],
    })
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
    });
    let capabilities = json!({
        "tools": { "listChanged": false },
        "resources": { "listChanged": false },
    });
    let instructions =
        "Read-only Kaspa BlockDAG query tools backed by a kaspad RPC endpoint. No keys, no signing, no transaction submission.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions,
        }),
    )
}

/// Handles the 'tools/list' request with the static tool definitions.
fn handle_tools_list(req: &Request) -> Response {
    let tools = json!([
        {
            "name": "get_node_info",
            "description": "Get Kaspa node information and connection status.",
            "inputSchema": { "type": "object", "properties": {}, "additionalProperties": false }
        },
        {
            "name": "get_block_by_hash",
            "description": "Get detailed information about a specific block by its hash.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "block_hash": {"type": "string", "description": "Block hash: a 64-character hex string."},
                    "include_transactions": {"type": "boolean", "description": "Include full transaction bodies.", "default": false}
                },
                "required": ["block_hash"],
                "additionalProperties": false
            }
        },
        {
            "name": "get_latest_daa",
            "description": "Get the latest DAA (Difficulty Adjustment Algorithm) score, i.e. the blue score of the virtual selected parent.",
            "inputSchema": { "type": "object", "properties": {}, "additionalProperties": false }
        },
        {
            "name": "get_block_dag_info",
            "description": "Get BlockDAG state: tip hashes, difficulty, past median time, virtual DAA score.",
            "inputSchema": { "type": "object", "properties": {}, "additionalProperties": false }
        },
        {
            "name": "validate_address",
            "description": "Validate a Kaspa address format locally. Works even when the node is unreachable.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": {"type": "string", "description": "The Kaspa address to validate (e.g. kaspa:qpauqsvk7yf9unexwmxsnmg547mhyga37csh0kj53q6xxgl24ydxjsgzthw5j)."}
                },
                "required": ["address"],
                "additionalProperties": false
            }
        },
        {
            "name": "get_address_balance",
            "description": "Get the balance of a Kaspa address in sompi (the smallest unit).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": {"type": "string", "description": "The Kaspa address to check."}
                },
                "required": ["address"],
                "additionalProperties": false
            }
        },
        {
            "name": "get_address_utxos",
            "description": "Get unspent transaction outputs for a list of Kaspa addresses (1 to 100 entries).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "addresses": {
                        "type": "array",
                        "items": {"type": "string"},
                        "minItems": 1,
                        "maxItems": 100,
                        "description": "Addresses to fetch UTXOs for."
                    }
                },
                "required": ["addresses"],
                "additionalProperties": false
            }
        },
        {
            "name": "get_mempool_transactions",
            "description": "Get pending mempool transactions referencing any of the given addresses.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "addresses": {
                        "type": "array",
                        "items": {"type": "string"},
                        "minItems": 1,
                        "description": "Addresses to look up in the mempool."
                    },
                    "include_orphan_pool": {"type": "boolean", "description": "Also search the orphan pool.", "default": true}
                },
                "required": ["addresses"],
                "additionalProperties": false
            }
        }
    ]);
    Response::success(req.id.clone(), json!({ "tools": tools }))
}

/// Handles the 'resources/list' request.
fn handle_resources_list(req: &Request) -> Response {
    let resources = json!([
        {
            "uri": resources::STATUS_URI,
            "name": "Server Status",
            "description": "Current server status and configuration",
            "mimeType": "text/markdown"
        },
        {
            "uri": resources::EXAMPLES_URI,
            "name": "Usage Examples",
            "description": "Examples of how to use the Kaspa MCP server",
            "mimeType": "text/markdown"
        }
    ]);
    Response::success(req.id.clone(), json!({ "resources": resources }))
}

/// Handles the 'resources/read' request. Neither resource touches the
/// gateway's network path.
async fn handle_resource_read(req: &Request, state: &AppState) -> Response {
    let uri = req
        .params
        .as_ref()
        .and_then(|p| p.get("uri"))
        .and_then(|u| u.as_str());

    let text = match uri {
        Some(resources::STATUS_URI) => resources::status_markdown(state).await,
        Some(resources::EXAMPLES_URI) => resources::examples_markdown().to_string(),
        Some(other) => {
            return Response::error(
                req.id.clone(),
                error_codes::INVALID_PARAMS,
                format!("Unknown resource: {}", other),
            )
        }
        None => {
            return Response::error(
                req.id.clone(),
                error_codes::INVALID_PARAMS,
                "Missing 'uri' field in params".into(),
            )
        }
    };

    Response::success(
        req.id.clone(),
        json!({
            "contents": [{
                "uri": uri,
                "mimeType": "text/markdown",
                "text": text,
            }]
        }),
    )
}
