use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::{AppState, SERVER_NAME, SERVER_VERSION};

// Reads only the gateway's cached reachability flag; no network call.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.kaspa.health().await;
    Json(json!({
        "server": SERVER_NAME,
        "version": SERVER_VERSION,
        "kaspa_rpc_url": state.kaspa.endpoint().to_string(),
        "reachable": health.reachable,
        "last_error": health.last_error,
        "debug": state.config.debug,
    }))
}
