// src/mcp/resources.rs
//
// Read-only informational resources. Neither body ever takes the
// gateway's network path: `status` reads the cached reachability flag and
// the examples page is static text.

use crate::{AppState, SERVER_NAME, SERVER_VERSION};

pub const STATUS_URI: &str = "kaspa://status";
pub const EXAMPLES_URI: &str = "kaspa://docs/examples";

pub async fn status_markdown(state: &AppState) -> String {
    let health = state.kaspa.health().await;
    let reachable = match health.reachable {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown (no call made yet)",
    };

    let mut content = String::new();
    content.push_str("# Kaspa MCP Server Status\n\n");
    content.push_str(&format!("**Server**: {} v{}\n", SERVER_NAME, SERVER_VERSION));
    content.push_str(&format!("**Kaspa RPC**: {}\n", state.kaspa.endpoint()));
    content.push_str(&format!("**Node reachable**: {}\n", reachable));
    content.push_str(&format!(
        "**Debug mode**: {}\n",
        if state.config.debug { "on" } else { "off" }
    ));
    if let Some(last_error) = &health.last_error {
        content.push_str(&format!("**Last error**: {}\n", last_error));
    }

    content.push_str("\n## Available Tools\n");
    for name in crate::mcp::handler::TOOL_NAMES {
        content.push_str(&format!("- `{}`\n", name));
    }

    content
}

pub fn examples_markdown() -> &'static str {
    r#"# Kaspa MCP Server - Usage Examples

## 1. Check Node Status
```
get_node_info()
```

## 2. Get Block by Hash
```
get_block_by_hash(block_hash="0000000000000000000000000000000000000000000000000000000000000000")

# With full transaction bodies
get_block_by_hash(block_hash="...", include_transactions=true)
```

## 3. Get Latest DAA Score
```
get_latest_daa()
```

## 4. Get BlockDAG Information
```
get_block_dag_info()
```

## 5. Validate an Address (works offline)
```
validate_address(address="kaspa:qpauqsvk7yf9unexwmxsnmg547mhyga37csh0kj53q6xxgl24ydxjsgzthw5j")
```

## 6. Get Address Balance
```
get_address_balance(address="kaspa:qpauqsvk7yf9unexwmxsnmg547mhyga37csh0kj53q6xxgl24ydxjsgzthw5j")
```

## 7. Get UTXOs for Addresses
```
get_address_utxos(addresses=["kaspa:..."])
```

## 8. Get Mempool Transactions for Addresses
```
get_mempool_transactions(addresses=["kaspa:..."])
```

All responses share one shape: `status` is `"success"` or `"error"`, a
`timestamp` records when the reply was produced, and errors carry a
machine-readable `kind` (`invalid_input`, `not_found`, `unreachable`,
`timeout`, `remote_error`) next to the message.

For live server state, read the `kaspa://status` resource.
"#
}
