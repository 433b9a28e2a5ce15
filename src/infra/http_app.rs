use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::api;
use crate::clients::wttr::WttrClient;
use crate::infra::http::audit::{audit_log, panic_response};
use crate::infra::http::json as rpc_json;
use crate::tools::registry::Registry;

/// REST gateway: weather proxy, health, docs and a JSON catch-all.
pub fn build_rest_app(client: WttrClient) -> Router {
    Router::new()
        .route("/", get(api::rest::root))
        .route("/health", get(api::rest::health))
        .route("/docs", get(api::rest::docs))
        .route("/openapi.json", get(api::rest::openapi))
        .route("/:location", get(api::rest::weather).fallback(api::rest::not_found))
        .fallback(api::rest::not_found)
        .with_state(client)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(audit_log))
}

/// RPC gateway: JSON-RPC at `/mcp` plus health and info.
pub fn build_mcp_app(registry: Registry) -> Router {
    Router::new()
        .route("/health", get(api::mcp::health))
        .route("/info", get(api::mcp::info))
        .route("/mcp", post(api::mcp::http))
        .with_state(registry)
        .layer(CatchPanicLayer::custom(rpc_json::panic_response))
}
