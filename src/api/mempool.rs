use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use validator::Validate;

use super::error_response;
use crate::AppState;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct MempoolRequest {
    #[validate(length(min = 1, message = "addresses must not be empty"))]
    pub addresses: Vec<String>,
    #[serde(default = "default_true")]
    pub include_orphan_pool: bool,
}

// POST /mempool
pub async fn mempool_handler(
    State(state): State<AppState>,
    Json(body): Json<MempoolRequest>,
) -> impl IntoResponse {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "kind": "invalid_input", "message": e.to_string() } })),
        )
            .into_response();
    }
    match state
        .kaspa
        .get_mempool_transactions(&body.addresses, body.include_orphan_pool)
        .await
    {
        Ok(entries) => (
            StatusCode::OK,
            Json(json!({ "addresses": body.addresses, "mempool_transactions": entries })),
        )
            .into_response(),
        Err(e) => {
            error!("failed to get mempool transactions: {e}");
            error_response(e)
        }
    }
}
