// src/kaspa/error.rs

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Fixed error taxonomy surfaced to callers, regardless of which tool
/// triggered the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller-supplied argument failed schema or domain validation.
    InvalidInput,
    /// Well-formed request referencing something that does not exist.
    NotFound,
    /// Could not establish a connection to the kaspad endpoint.
    Unreachable,
    /// The call exceeded the configured deadline.
    Timeout,
    /// Kaspad accepted the connection but returned an application error.
    RemoteError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unreachable => "unreachable",
            ErrorKind::Timeout => "timeout",
            ErrorKind::RemoteError => "remote_error",
        };
        f.write_str(label)
    }
}

/// Errors produced by the RPC gateway. Every transport failure is
/// normalized into one of these variants before it reaches the dispatcher.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("cannot reach kaspad: {0}")]
    Unreachable(String),
    #[error("kaspad call timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    RemoteError(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::InvalidInput(_) => ErrorKind::InvalidInput,
            GatewayError::NotFound(_) => ErrorKind::NotFound,
            GatewayError::Unreachable(_) => ErrorKind::Unreachable,
            GatewayError::Timeout(_) => ErrorKind::Timeout,
            GatewayError::RemoteError(_) => ErrorKind::RemoteError,
        }
    }

    /// Classify a reqwest transport failure into the taxonomy.
    pub(crate) fn from_transport(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(deadline)
        } else if err.is_connect() {
            GatewayError::Unreachable(err.to_string())
        } else if err.is_decode() {
            GatewayError::RemoteError(format!("undecodable kaspad reply: {}", err))
        } else {
            GatewayError::Unreachable(err.to_string())
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Tool-level error: the gateway taxonomy plus a human-readable message,
/// ready to be embedded in a result payload.
#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            message: message.into(),
        }
    }
}

impl From<GatewayError> for ToolError {
    fn from(err: GatewayError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
