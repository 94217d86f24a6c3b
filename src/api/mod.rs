//! # API Module
//!
//! HTTP handlers for the Kaspa MCP server's REST mode. Every endpoint is
//! a thin wrapper over the same gateway the MCP tools use.
//!
//! ## Available Endpoints
//!
//! ### Server
//! - `GET /health` - Liveness check
//! - `GET /status` - Endpoint URL, cached reachability, debug flag
//! - `POST /rpc` - JSON-RPC passthrough to the MCP dispatcher
//!
//! ### Node Queries
//! - `GET /node/info` - Node version and sync state
//! - `GET /node/dag` - BlockDAG information
//! - `GET /node/daa` - Latest DAA score
//!
//! ### Block Queries
//! - `GET /block/:hash` - Block by hash (`?include_transactions=true` for bodies)
//!
//! ### Address Queries
//! - `GET /address/:address/balance` - Balance in sompi
//! - `GET /address/:address/validate` - Local format check
//! - `POST /address/utxos` - UTXOs for a list of addresses
//! - `POST /mempool` - Mempool transactions for a list of addresses

pub mod address;
pub mod block;
pub mod health;
pub mod mempool;
pub mod node;
pub mod rpc;
pub mod status;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::kaspa::{ErrorKind, GatewayError};
use crate::AppState;

/// All REST routes, nested under `/api` by the binary.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/status", get(status::status_handler))
        .route("/node/info", get(node::node_info_handler))
        .route("/node/dag", get(node::block_dag_info_handler))
        .route("/node/daa", get(node::latest_daa_handler))
        .route("/block/:hash", get(block::get_block_handler))
        .route("/address/:address/balance", get(address::balance_handler))
        .route("/address/:address/validate", get(address::validate_handler))
        .route("/address/utxos", post(address::utxos_handler))
        .route("/mempool", post(mempool::mempool_handler))
        .route("/rpc", post(rpc::rpc_handler))
}

/// Map a gateway error onto an HTTP status plus a structured error body.
pub(crate) fn error_response(err: GatewayError) -> Response {
    let status = match err.kind() {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Unreachable | ErrorKind::RemoteError => StatusCode::BAD_GATEWAY,
    };
    let body = json!({
        "error": { "kind": err.kind(), "message": err.to_string() }
    });
    (status, Json(body)).into_response()
}
