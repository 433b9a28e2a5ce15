use thiserror::Error;

use crate::core::mcp::{INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND};

/// Failures a tool reports back through the RPC envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("{0}")]
    InvalidParams(String),
    #[error("{0}")]
    MethodNotFound(String),
    #[error("{0}")]
    Internal(String),
    /// The call envelope itself is unusable (eg. no `arguments` object).
    #[error("malformed tool call: {0}")]
    BadEnvelope(String),
}

/// Gateway-wide error model for uniform HTTP/JSON-RPC mapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Answered with HTTP 200 and a JSON-RPC `error` object.
    #[error("{message}")]
    Rpc { code: i32, message: String },
    /// Unexpected failure; answered with HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn method_not_found(message: impl Into<String>) -> Self {
        GatewayError::Rpc { code: METHOD_NOT_FOUND, message: message.into() }
    }
}

impl From<ToolError> for GatewayError {
    fn from(e: ToolError) -> Self {
        match e {
            ToolError::InvalidParams(message) => GatewayError::Rpc {
                code: INVALID_PARAMS,
                message,
            },
            ToolError::MethodNotFound(message) => GatewayError::Rpc {
                code: METHOD_NOT_FOUND,
                message,
            },
            ToolError::Internal(message) => GatewayError::Rpc {
                code: INTERNAL_ERROR,
                message,
            },
            bad @ ToolError::BadEnvelope(_) => GatewayError::Internal(bad.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_displays_message() {
        let e = ToolError::Internal("boom".into());
        assert_eq!(e.to_string(), "boom");
    }

    #[test]
    fn tool_errors_map_to_rpc_codes() {
        let gw: GatewayError = ToolError::InvalidParams("nope".into()).into();
        assert_eq!(gw, GatewayError::Rpc { code: -32602, message: "nope".into() });
        let gw: GatewayError = ToolError::Internal("down".into()).into();
        assert_eq!(gw, GatewayError::Rpc { code: -32603, message: "down".into() });
    }

    #[test]
    fn bad_envelope_escalates_to_internal() {
        let gw: GatewayError = ToolError::BadEnvelope("no arguments".into()).into();
        assert!(matches!(gw, GatewayError::Internal(m) if m.contains("no arguments")));
    }
}
