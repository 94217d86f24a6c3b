use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::error_response;
use crate::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct BlockQuery {
    #[serde(default)]
    pub include_transactions: bool,
}

// GET /block/:hash?include_transactions=bool
pub async fn get_block_handler(
    Path(hash): Path<String>,
    Query(query): Query<BlockQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state
        .kaspa
        .get_block_by_hash(&hash, query.include_transactions)
        .await
    {
        Ok(block) => (
            StatusCode::OK,
            Json(json!({ "block_hash": hash, "block": block })),
        )
            .into_response(),
        Err(e) => {
            error!("failed to get block {hash}: {e}");
            error_response(e)
        }
    }
}
