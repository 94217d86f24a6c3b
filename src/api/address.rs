use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use validator::Validate;

use super::error_response;
use crate::kaspa::validate_address;
use crate::AppState;

// GET /address/:address/balance
pub async fn balance_handler(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.kaspa.get_address_balance(&address).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({ "address": balance.address, "balance": balance.balance })),
        )
            .into_response(),
        Err(e) => {
            error!("failed to get balance for {address}: {e}");
            error_response(e)
        }
    }
}

// GET /address/:address/validate. Pure local check, no gateway call.
pub async fn validate_handler(Path(address): Path<String>) -> impl IntoResponse {
    Json(json!({ "validation": validate_address(&address).to_json() }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UtxosRequest {
    #[validate(length(min = 1, max = 100, message = "addresses must contain 1 to 100 entries"))]
    pub addresses: Vec<String>,
}

// POST /address/utxos
pub async fn utxos_handler(
    State(state): State<AppState>,
    Json(body): Json<UtxosRequest>,
) -> impl IntoResponse {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "kind": "invalid_input", "message": e.to_string() } })),
        )
            .into_response();
    }
    match state.kaspa.get_address_utxos(&body.addresses).await {
        Ok(utxos) => (
            StatusCode::OK,
            Json(json!({ "addresses": body.addresses, "utxos": utxos })),
        )
            .into_response(),
        Err(e) => {
            error!("failed to get UTXOs: {e}");
            error_response(e)
        }
    }
}
