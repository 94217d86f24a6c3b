// src/kaspa/client.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use super::address::{ensure_valid_address, ensure_valid_addresses};
use super::error::{GatewayError, GatewayResult};
use super::models::{
    AddressBalance, BlockDagInfo, BlueScoreResponse, NodeInfo, UtxoByAddressEntry,
    UtxosByAddressesResponse,
};

/// Upper bound on the number of addresses accepted by a single UTXO query.
pub const MAX_UTXO_ADDRESSES: usize = 100;

const BLOCK_HASH_LEN: usize = 64;

/// Cached view of the node's reachability, refreshed after every call.
#[derive(Debug, Clone, Default)]
pub struct ConnectionHealth {
    /// `None` until the first call has completed.
    pub reachable: Option<bool>,
    pub last_error: Option<String>,
}

/// Gateway to a kaspad JSON-RPC endpoint.
///
/// Every network-calling operation funnels through [`KaspaClient::call`],
/// which owns the timeout policy, the single transparent retry on
/// transient connection failures, and the normalization of transport
/// errors into the fixed taxonomy. The tools therefore fail identically
/// no matter which one hit the problem.
#[derive(Clone)]
pub struct KaspaClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    next_id: Arc<AtomicU64>,
    health: Arc<RwLock<ConnectionHealth>>,
}

impl KaspaClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            timeout,
            next_id: Arc::new(AtomicU64::new(1)),
            health: Arc::new(RwLock::new(ConnectionHealth::default())),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Snapshot of the cached reachability state. Never touches the
    /// network; the `status` resource and REST endpoint read this.
    pub async fn health(&self) -> ConnectionHealth {
        self.health.read().await.clone()
    }

    // --- remote capabilities ---

    pub async fn get_node_info(&self) -> GatewayResult<NodeInfo> {
        let raw = self.call("getInfo", json!({})).await?;
        decode("getInfo", raw)
    }

    pub async fn get_block_by_hash(
        &self,
        hash: &str,
        include_transactions: bool,
    ) -> GatewayResult<Value> {
        ensure_block_hash(hash)?;
        self.call(
            "getBlock",
            json!({
                "hash": hash,
                "includeTransactions": include_transactions,
            }),
        )
        .await
    }

    pub async fn get_latest_daa_score(&self) -> GatewayResult<u64> {
        let raw = self
            .call("getVirtualSelectedParentBlueScore", json!({}))
            .await?;
        let reply: BlueScoreResponse = decode("getVirtualSelectedParentBlueScore", raw)?;
        Ok(reply.blue_score)
    }

    pub async fn get_block_dag_info(&self) -> GatewayResult<BlockDagInfo> {
        let raw = self.call("getBlockDagInfo", json!({})).await?;
        decode("getBlockDagInfo", raw)
    }

    pub async fn get_address_balance(&self, address: &str) -> GatewayResult<AddressBalance> {
        ensure_valid_address(address)?;
        let raw = self
            .call("getBalanceByAddress", json!({ "address": address }))
            .await?;
        let mut balance: AddressBalance = decode("getBalanceByAddress", raw)?;
        balance.address = address.to_string();
        Ok(balance)
    }

    pub async fn get_address_utxos(
        &self,
        addresses: &[String],
    ) -> GatewayResult<Vec<UtxoByAddressEntry>> {
        ensure_valid_addresses(addresses, MAX_UTXO_ADDRESSES)?;
        let raw = self
            .call("getUtxosByAddresses", json!({ "addresses": addresses }))
            .await?;
        let reply: UtxosByAddressesResponse = decode("getUtxosByAddresses", raw)?;
        Ok(reply.entries)
    }

    pub async fn get_mempool_transactions(
        &self,
        addresses: &[String],
        include_orphan_pool: bool,
    ) -> GatewayResult<Value> {
        ensure_valid_addresses(addresses, usize::MAX)?;
        self.call(
            "getMempoolEntriesByAddresses",
            json!({
                "addresses": addresses,
                "includeOrphanPool": include_orphan_pool,
            }),
        )
        .await
    }

    // --- the single perform-call routine ---

    async fn call(&self, method: &str, params: Value) -> GatewayResult<Value> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        // When the node is already known-unreachable, skip the transparent
        // retry so the caller fails fast instead of paying for a second
        // connect attempt. The first attempt still goes out, which is what
        // lets the flag flip back once the node recovers.
        let known_down = self.health.read().await.reachable == Some(false);
        let max_attempts = if known_down { 1 } else { 2 };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.attempt(method, &payload).await {
                Ok(result) => {
                    self.record_outcome(true, None).await;
                    return Ok(result);
                }
                Err(err) => {
                    match &err {
                        GatewayError::Unreachable(_) | GatewayError::Timeout(_) => {
                            self.record_outcome(false, Some(err.to_string())).await;
                        }
                        // The node answered; the failure is application
                        // level, so the endpoint itself is reachable.
                        _ => self.record_outcome(true, None).await,
                    }
                    let transient = matches!(err, GatewayError::Unreachable(_));
                    if !transient || attempt >= max_attempts {
                        return Err(err);
                    }
                    debug!(method, attempt, "kaspad connection failed, retrying once");
                }
            }
        }
    }

    async fn attempt(&self, method: &str, payload: &Value) -> GatewayResult<Value> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RemoteError(format!(
                "kaspad returned HTTP {} for {}: {}",
                status,
                method,
                body.trim()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::from_transport(e, self.timeout))?;

        if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            // Kaspad reports missing entities through the error message
            // rather than a structured code.
            if message.to_lowercase().contains("not found") {
                return Err(GatewayError::NotFound(message));
            }
            return Err(GatewayError::RemoteError(message));
        }

        body.get("result").cloned().ok_or_else(|| {
            GatewayError::RemoteError(format!("kaspad reply to {} has no 'result' field", method))
        })
    }

    async fn record_outcome(&self, reachable: bool, error: Option<String>) {
        let mut health = self.health.write().await;
        if health.reachable != Some(reachable) {
            if reachable {
                debug!(endpoint = %self.endpoint, "kaspad endpoint reachable");
            } else {
                warn!(endpoint = %self.endpoint, error = error.as_deref().unwrap_or(""), "kaspad endpoint unreachable");
            }
        }
        health.reachable = Some(reachable);
        health.last_error = error;
    }
}

fn ensure_block_hash(hash: &str) -> GatewayResult<()> {
    if hash.len() != BLOCK_HASH_LEN || hex::decode(hash).is_err() {
        return Err(GatewayError::InvalidInput(format!(
            "block hash must be a {}-character hex string, got '{}'",
            BLOCK_HASH_LEN, hash
        )));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(method: &str, raw: Value) -> GatewayResult<T> {
    serde_json::from_value(raw)
        .map_err(|e| GatewayError::RemoteError(format!("malformed {} reply: {}", method, e)))
}
