use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::core::error::GatewayError;
use crate::core::mcp::{err as rpc_err, ok as rpc_ok, RpcResp, INTERNAL_ERROR};

pub fn ok(id: serde_json::Value, result: serde_json::Value) -> Json<RpcResp> {
    Json(rpc_ok(id, result))
}

pub fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Json<RpcResp> {
    Json(rpc_err(id, code, message, None))
}

fn internal_error(id: serde_json::Value) -> Response {
    let body = error(id, INTERNAL_ERROR, "Internal server error");
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

/// Map a GatewayError into a response: RPC errors ride on HTTP 200, anything
/// unexpected becomes HTTP 500 with a generic internal error envelope.
pub fn from_gateway_error(id: serde_json::Value, err: GatewayError) -> Response {
    match err {
        GatewayError::Rpc { code, message } => error(id, code, message).into_response(),
        GatewayError::Internal(detail) => {
            tracing::error!(error = %detail, "MCP request error");
            internal_error(id)
        }
    }
}

/// Panic handler for the RPC router. The request id is gone by now, so the
/// envelope carries `null`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "MCP request error");
    internal_error(serde_json::Value::Null)
}
