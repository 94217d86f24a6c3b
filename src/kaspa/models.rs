// src/kaspa/models.rs
//
// Typed views over kaspad RPC replies. Kaspad is free to add fields at any
// time, so every struct keeps a flattened `extra` map and defaults for
// anything missing; deep block and mempool structures are passed through
// as raw JSON.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Kaspad serializes some 64-bit counters as JSON strings (proto3 JSON
/// mapping); accept either representation.
fn u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientU64;

    impl<'de> serde::de::Visitor<'de> for LenientU64 {
        type Value = u64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("an unsigned integer or a decimal string")
        }

        fn visit_u64<E>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::custom("negative value for unsigned counter"))
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<u64, E> {
            v.parse::<u64>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(LenientU64)
}

/// Reply to `getInfo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeInfo {
    pub server_version: String,
    pub p2p_id: String,
    #[serde(deserialize_with = "u64_lenient")]
    pub mempool_size: u64,
    pub is_synced: bool,
    pub is_utxo_indexed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reply to `getBlockDagInfo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockDagInfo {
    pub network_name: String,
    #[serde(deserialize_with = "u64_lenient")]
    pub block_count: u64,
    #[serde(deserialize_with = "u64_lenient")]
    pub header_count: u64,
    pub tip_hashes: Vec<String>,
    pub difficulty: f64,
    #[serde(deserialize_with = "u64_lenient")]
    pub past_median_time: u64,
    pub virtual_parent_hashes: Vec<String>,
    pub pruning_point_hash: String,
    #[serde(deserialize_with = "u64_lenient")]
    pub virtual_daa_score: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reply to `getVirtualSelectedParentBlueScore`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlueScoreResponse {
    #[serde(deserialize_with = "u64_lenient")]
    pub blue_score: u64,
}

/// Reply to `getBalanceByAddress`, paired with the queried address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressBalance {
    pub address: String,
    #[serde(deserialize_with = "u64_lenient")]
    pub balance: u64,
}

/// One unspent output from `getUtxosByAddresses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UtxoByAddressEntry {
    pub address: String,
    pub outpoint: UtxoOutpoint,
    pub utxo_entry: UtxoEntryData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UtxoOutpoint {
    pub transaction_id: String,
    pub index: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UtxoEntryData {
    #[serde(deserialize_with = "u64_lenient")]
    pub amount: u64,
    pub script_public_key: Value,
    #[serde(deserialize_with = "u64_lenient")]
    pub block_daa_score: u64,
    pub is_coinbase: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UtxosByAddressesResponse {
    pub entries: Vec<UtxoByAddressEntry>,
}
