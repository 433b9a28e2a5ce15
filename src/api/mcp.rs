use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value as J};

use crate::core::error::GatewayError;
use crate::core::mcp::{
    render_value, InitializeResult, RpcMethod, RpcReq, SERVER_NAME, SERVER_VERSION,
};
use crate::infra::http::json as http_json;
use crate::tools::registry::Registry;

async fn call_tool(reg: &Registry, params: &J) -> Result<J, GatewayError> {
    if params.is_null() {
        return Err(GatewayError::Internal("tools/call without params".into()));
    }
    let name = match params.get("name") {
        Some(J::String(name)) => name.clone(),
        other => {
            let shown = render_value(other);
            return Err(GatewayError::method_not_found(format!("Unknown tool: {shown}")));
        }
    };
    let args = params.get("arguments").unwrap_or(&J::Null);
    Ok(reg.call(&name, args).await?)
}

/// Resolve one request against the closed method table.
pub async fn dispatch(reg: &Registry, req: &RpcReq) -> Result<J, GatewayError> {
    match RpcMethod::from(req.method.as_ref()) {
        RpcMethod::Initialize => {
            serde_json::to_value(InitializeResult::new(reg.capabilities()))
                .map_err(|e| GatewayError::Internal(e.to_string()))
        }
        RpcMethod::ToolsList => Ok(reg.tools_list()),
        RpcMethod::ToolsCall => call_tool(reg, &req.params).await,
        RpcMethod::Unknown(method) => Err(GatewayError::method_not_found(format!(
            "Unknown method: {method}"
        ))),
    }
}

// HTTP handler. The body is taken raw so that no extractor can answer a
// notification before the `id` check.
pub async fn http(State(reg): State<Registry>, body: Bytes) -> Response {
    let req = RpcReq::from_body(&body);
    let method = req.method_name();
    if req.is_notification() {
        // Notifications never get a body, whatever the method.
        tracing::debug!(method = %method, "notification received");
        return StatusCode::ACCEPTED.into_response();
    }
    let id = req.id.clone().unwrap_or(J::Null);
    tracing::debug!(method = %method, id = %id, "HTTP handler invoked");
    let resp = match dispatch(&reg, &req).await {
        Ok(result) => http_json::ok(id, result).into_response(),
        Err(e) => {
            tracing::warn!(method = %method, error = %e, "MCP request failed");
            http_json::from_gateway_error(id, e)
        }
    };
    tracing::debug!(status = %resp.status(), "HTTP handler completed");
    resp
}

pub async fn health() -> Json<J> {
    Json(json!({
        "status": "healthy",
        "server": "mcp-weather-server",
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}

pub async fn info(State(reg): State<Registry>) -> Json<J> {
    Json(json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
        "description": "MCP server for weather data from wttr.in",
        "endpoint": "/mcp",
        "tools": reg.names(),
    }))
}
