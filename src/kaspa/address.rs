// src/kaspa/address.rs

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde_json::{json, Value};

use super::error::{GatewayError, GatewayResult};

lazy_static! {
    /// Address prefixes for the Kaspa networks.
    static ref NETWORK_PREFIXES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("kaspa", "mainnet");
        m.insert("kaspatest", "testnet");
        m.insert("kaspasim", "simnet");
        m.insert("kaspadev", "devnet");
        m
    };
}

// Kaspa address payloads are bech32-encoded; these four characters are
// excluded from the bech32 alphabet.
const FORBIDDEN_BECH32_CHARS: [char; 4] = ['1', 'b', 'i', 'o'];

const MIN_PAYLOAD_LEN: usize = 50;
const MAX_PAYLOAD_LEN: usize = 70;

/// Outcome of a local address check. Purely syntactic: no network I/O is
/// ever performed, so validation keeps working while the node is down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressCheck {
    Valid {
        network: &'static str,
        prefix: String,
        payload: String,
    },
    Invalid {
        reason: String,
    },
}

impl AddressCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, AddressCheck::Valid { .. })
    }

    pub fn to_json(&self) -> Value {
        match self {
            AddressCheck::Valid {
                network,
                prefix,
                payload,
            } => json!({
                "valid": true,
                "network": network,
                "prefix": prefix,
                "payload": payload,
            }),
            AddressCheck::Invalid { reason } => json!({
                "valid": false,
                "reason": reason,
            }),
        }
    }
}

/// Validate a Kaspa address: `prefix:payload` where the prefix names a
/// known network and the payload is a plausibly-sized bech32 string.
pub fn validate_address(address: &str) -> AddressCheck {
    let Some((prefix, payload)) = address.split_once(':') else {
        return AddressCheck::Invalid {
            reason: "missing network prefix (expected 'kaspa:', 'kaspatest:', ...)".to_string(),
        };
    };

    let Some(network) = NETWORK_PREFIXES.get(prefix).copied() else {
        let mut known: Vec<&str> = NETWORK_PREFIXES.keys().copied().collect();
        known.sort_unstable();
        return AddressCheck::Invalid {
            reason: format!(
                "unknown network prefix '{}' (known prefixes: {})",
                prefix,
                known.join(", ")
            ),
        };
    };

    if payload.len() < MIN_PAYLOAD_LEN || payload.len() > MAX_PAYLOAD_LEN {
        return AddressCheck::Invalid {
            reason: format!(
                "payload length {} is outside the {}..={} range expected for Kaspa addresses",
                payload.len(),
                MIN_PAYLOAD_LEN,
                MAX_PAYLOAD_LEN
            ),
        };
    }

    if !payload
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return AddressCheck::Invalid {
            reason: "payload contains characters outside the bech32 alphabet (a-z, 0-9)"
                .to_string(),
        };
    }

    if payload.chars().any(|c| FORBIDDEN_BECH32_CHARS.contains(&c)) {
        return AddressCheck::Invalid {
            reason: "payload contains characters excluded from bech32 (1, b, i, o)".to_string(),
        };
    }

    AddressCheck::Valid {
        network,
        prefix: prefix.to_string(),
        payload: payload.to_string(),
    }
}

/// Gateway-side guard: reject before any network call when the address is
/// malformed.
pub fn ensure_valid_address(address: &str) -> GatewayResult<()> {
    match validate_address(address) {
        AddressCheck::Valid { .. } => Ok(()),
        AddressCheck::Invalid { reason } => Err(GatewayError::InvalidInput(format!(
            "invalid address '{}': {}",
            address, reason
        ))),
    }
}

/// Guard for a batch of addresses: non-empty, bounded, every entry valid.
pub fn ensure_valid_addresses(addresses: &[String], max: usize) -> GatewayResult<()> {
    if addresses.is_empty() {
        return Err(GatewayError::InvalidInput(
            "addresses list must not be empty".to_string(),
        ));
    }
    if addresses.len() > max {
        return Err(GatewayError::InvalidInput(format!(
            "addresses list has {} entries, the maximum is {}",
            addresses.len(),
            max
        )));
    }
    for address in addresses {
        ensure_valid_address(address)?;
    }
    Ok(())
}
