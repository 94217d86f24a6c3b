// src/main.rs

use std::env;
use std::net::SocketAddr;

use axum::Router;
use kaspa_mcp_server::{
    api,
    config::Config,
    kaspa::KaspaClient,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState, SERVER_NAME, SERVER_VERSION,
};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) {
    let app = Router::new()
        .nest("/api", api::router())
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    info!("HTTP server listening on {}", addr);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("HTTP server error: {}", e);
        std::process::exit(1);
    }
}

// --- MCP Server Logic ---
// One JSON-RPC request per line on stdin, one response per line on
// stdout. Logging goes to stderr so the protocol stream stays clean.
async fn run_mcp_server(state: AppState) {
    info!("starting MCP server on stdin/stdout");

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();

        match stdin.read_line(&mut line).await {
            Ok(0) => {
                info!("EOF received, shutting down MCP server");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if state.config.debug {
                    debug!("received: {}", line);
                }

                let response = match serde_json::from_str::<Request>(line) {
                    Ok(request) => handle_mcp_request(request, state.clone()).await,
                    Err(parse_error) => {
                        error!("JSON parse error: {}", parse_error);
                        Some(Response::error(
                            serde_json::Value::Null,
                            error_codes::PARSE_ERROR,
                            format!("Parse error: {}", parse_error),
                        ))
                    }
                };

                if let Some(response) = response {
                    if let Ok(response_json) = serde_json::to_string(&response) {
                        if state.config.debug {
                            debug!("sending: {}", response_json);
                        }
                        if let Err(e) = stdout
                            .write_all(format!("{}\n", response_json).as_bytes())
                            .await
                        {
                            error!("failed to write response: {}", e);
                            break;
                        }
                        if let Err(e) = stdout.flush().await {
                            error!("failed to flush stdout: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!("failed to read from stdin: {}", e);
                break;
            }
        }
    }

    info!("MCP server shutting down");
}

#[tokio::main]
async fn main() {
    // Logging must go to stderr: stdout carries the MCP protocol stream.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kaspa_mcp_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let kaspa = match KaspaClient::new(config.kaspa_rpc_url.clone(), config.rpc_timeout) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to initialize Kaspa RPC client: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("{} v{}", SERVER_NAME, SERVER_VERSION);
    info!("Kaspa RPC endpoint: {}", config.kaspa_rpc_url);
    if config.debug {
        info!("debug mode enabled");
    }

    // Probe the node once so startup logs show whether it is reachable.
    // The server starts either way; tools report errors per call.
    match kaspa.get_node_info().await {
        Ok(info) => info!(
            version = %info.server_version,
            synced = info.is_synced,
            "connected to kaspad"
        ),
        Err(e) => warn!("kaspad not reachable yet: {}", e),
    }

    let state = AppState { config, kaspa };

    // MCP mode (stdin/stdout) or HTTP server mode.
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--mcp") || env::var("MCP_MODE").is_ok() {
        run_mcp_server(state).await;
    } else {
        run_http_server(state).await;
    }
}
