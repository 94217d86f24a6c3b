// src/config.rs

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_RPC_URL: &str = "http://localhost:16110";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

// All configuration, loaded once at startup from the environment (and a
// .env file when present). Not hot-reloaded.
#[derive(Clone, Debug)]
pub struct Config {
    /// kaspad JSON-RPC endpoint.
    pub kaspa_rpc_url: Url,
    /// Per-call deadline for gateway requests.
    pub rpc_timeout: Duration,
    /// Port for the HTTP serving mode.
    pub port: u16,
    /// Verbose logging of payloads.
    pub debug: bool,
}

impl Config {
    /// Loads configuration from environment variables. Malformed values
    /// are fatal: the process should exit non-zero rather than run with
    /// a half-parsed configuration.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let raw_url = env::var("KASPA_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        let kaspa_rpc_url = Url::parse(&raw_url)
            .with_context(|| format!("KASPA_RPC_URL is not a valid URL: '{}'", raw_url))?;

        let rpc_timeout = Duration::from_secs(
            env::var("RPC_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .context("RPC_TIMEOUT_SECS must be a valid number of seconds")?,
        );

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a valid port number")?;

        let debug = env::var("DEBUG")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        Ok(Config {
            kaspa_rpc_url,
            rpc_timeout,
            port,
            debug,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kaspa_rpc_url: Url::parse(DEFAULT_RPC_URL).expect("default RPC URL is valid"),
            rpc_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            port: 8080,
            debug: false,
        }
    }
}
