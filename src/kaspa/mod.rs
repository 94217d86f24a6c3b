// src/kaspa/mod.rs

// Gateway to the remote kaspad node: one client, one call routine, one
// error taxonomy shared by every tool.
pub mod address;
pub mod client;
pub mod error;
pub mod models;

pub use address::{validate_address, AddressCheck};
pub use client::{ConnectionHealth, KaspaClient, MAX_UTXO_ADDRESSES};
pub use error::{ErrorKind, GatewayError, GatewayResult, ToolError};
