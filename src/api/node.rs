use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::error;

use super::error_response;
use crate::AppState;

pub async fn node_info_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.kaspa.get_node_info().await {
        Ok(info) => (StatusCode::OK, Json(json!({ "node_info": info }))).into_response(),
        Err(e) => {
            error!("failed to get node info: {e}");
            error_response(e)
        }
    }
}

pub async fn block_dag_info_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.kaspa.get_block_dag_info().await {
        Ok(dag_info) => (StatusCode::OK, Json(json!({ "dag_info": dag_info }))).into_response(),
        Err(e) => {
            error!("failed to get BlockDAG info: {e}");
            error_response(e)
        }
    }
}

pub async fn latest_daa_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.kaspa.get_latest_daa_score().await {
        Ok(blue_score) => (StatusCode::OK, Json(json!({ "blue_score": blue_score }))).into_response(),
        Err(e) => {
            error!("failed to get DAA score: {e}");
            error_response(e)
        }
    }
}
