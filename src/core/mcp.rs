//! JSON-RPC envelope and the fixed MCP-style protocol surface served at `/mcp`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as J};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "weather-mcp-server";
pub const SERVER_VERSION: &str = "0.1.0";

pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// --- JSON-RPC structures ---

/// Incoming envelope. Every member is untyped JSON so that no envelope shape
/// is rejected before the notification check runs.
#[derive(Deserialize, Debug, Default)]
pub struct RpcReq {
    /// Accepted but never checked.
    #[serde(default)]
    pub jsonrpc: Option<J>,
    /// `None` only when the field is absent; an explicit `null` is `Some(Null)`.
    #[serde(default, deserialize_with = "present")]
    pub id: Option<J>,
    #[serde(default, deserialize_with = "present")]
    pub method: Option<J>,
    #[serde(default)]
    pub params: J,
}

fn present<'de, D>(de: D) -> Result<Option<J>, D::Error>
where
    D: Deserializer<'de>,
{
    J::deserialize(de).map(Some)
}

impl RpcReq {
    /// Decode a raw body. Anything that is not a JSON object decodes to an
    /// empty envelope, which has no `id` and is therefore a notification.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<J>(body) {
            Ok(envelope @ J::Object(_)) => serde_json::from_value(envelope).unwrap_or_default(),
            _ => RpcReq::default(),
        }
    }

    /// A request without an `id` is a notification and never gets a reply.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// The method as it appears in messages and logs.
    pub fn method_name(&self) -> String {
        render_value(self.method.as_ref())
    }
}

/// Text form of an optional JSON member: strings verbatim, a missing member as
/// `undefined`, anything else as its JSON text.
pub fn render_value(v: Option<&J>) -> String {
    match v {
        None => "undefined".to_owned(),
        Some(J::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RpcResp {
    pub jsonrpc: &'static str,
    pub id: J,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<J>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErr>,
}

#[derive(Serialize, Debug, Clone)]
pub struct RpcErr {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<J>,
}

pub fn ok(id: J, result: J) -> RpcResp {
    RpcResp {
        jsonrpc: "2.0",
        id,
        result: Some(result),
        error: None,
    }
}
pub fn err(id: J, code: i32, msg: impl Into<String>, data: Option<J>) -> RpcResp {
    RpcResp {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(RpcErr {
            code,
            message: msg.into(),
            data,
        }),
    }
}

// --- Method dispatch ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcMethod {
    Initialize,
    ToolsList,
    ToolsCall,
    Unknown(String),
}

impl From<&str> for RpcMethod {
    fn from(method: &str) -> Self {
        match method {
            "initialize" => RpcMethod::Initialize,
            "tools/list" => RpcMethod::ToolsList,
            "tools/call" => RpcMethod::ToolsCall,
            other => RpcMethod::Unknown(other.to_owned()),
        }
    }
}

impl From<Option<&J>> for RpcMethod {
    fn from(method: Option<&J>) -> Self {
        match method {
            Some(J::String(name)) => RpcMethod::from(name.as_str()),
            other => RpcMethod::Unknown(render_value(other)),
        }
    }
}

// --- Initialize result ---

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub server_info: ServerInfo,
    pub capabilities: Capabilities,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Tools are advertised as a map of tool name to `{description, inputSchema}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Capabilities {
    pub tools: Map<String, J>,
}

impl InitializeResult {
    pub fn new(tools: Map<String, J>) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.into(),
            server_info: ServerInfo { name: SERVER_NAME.into(), version: SERVER_VERSION.into() },
            capabilities: Capabilities { tools },
        }
    }
}
