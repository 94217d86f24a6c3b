//! Argument-extraction helpers for the tool dispatcher.

use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

use crate::kaspa::ToolError;

/// Extract a required argument from a tool's argument object.
pub fn required_arg<T: DeserializeOwned>(args: &Value, key: &str) -> Result<T, ToolError> {
    let value = args.get(key).cloned().unwrap_or(Value::Null);
    if value.is_null() {
        return Err(ToolError::invalid_input(format!(
            "missing required argument '{}'",
            key
        )));
    }
    from_value(value)
        .map_err(|_| ToolError::invalid_input(format!("invalid value for argument '{}'", key)))
}

/// Extract an optional argument; absent and `null` both mean `None`.
pub fn optional_arg<T: DeserializeOwned>(args: &Value, key: &str) -> Result<Option<T>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => from_value(value.clone())
            .map(Some)
            .map_err(|_| ToolError::invalid_input(format!("invalid value for argument '{}'", key))),
    }
}
