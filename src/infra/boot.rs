use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::clients::wttr::WttrClient;
use crate::infra::config::{McpConfig, RestConfig};
use crate::infra::http_app::{build_mcp_app, build_rest_app};
use crate::infra::signals::wait_for_termination;
use crate::tools::registry::build_registry;

/// A running listener. Dropping it leaves the server running; call `shutdown`.
pub struct ServerHandle {
    local_addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let _ = self.stop.send(());
        self.task.await.context("server task panicked")??;
        Ok(())
    }
}

/// Bind `0.0.0.0:port` (port 0 picks a free one) and serve `app` in the background.
pub async fn serve(app: Router, port: u16) -> anyhow::Result<ServerHandle> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    let local_addr = listener.local_addr()?;
    let (stop, stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stopped.await;
            })
            .await
    });
    Ok(ServerHandle { local_addr, stop, task })
}

pub async fn serve_rest(cfg: &RestConfig) -> anyhow::Result<ServerHandle> {
    let app = build_rest_app(WttrClient::new(&cfg.upstream));
    let handle = serve(app, cfg.port).await?;
    let addr = handle.local_addr();
    tracing::info!(addr = %addr, upstream = %cfg.upstream.base_url, "Weather proxy server running");
    tracing::info!("API documentation available at http://localhost:{}/docs", addr.port());
    Ok(handle)
}

pub async fn serve_mcp(cfg: &McpConfig) -> anyhow::Result<ServerHandle> {
    let app = build_mcp_app(build_registry(WttrClient::new(&cfg.upstream)));
    let handle = serve(app, cfg.port).await?;
    let addr = handle.local_addr();
    tracing::info!(addr = %addr, upstream = %cfg.upstream.base_url, "Weather MCP server running");
    tracing::info!("MCP endpoint: http://localhost:{}/mcp", addr.port());
    Ok(handle)
}

async fn run_until_signal(handle: ServerHandle) -> anyhow::Result<()> {
    let signal = wait_for_termination().await?;
    tracing::info!(signal = signal.name(), "Received signal, shutting down gracefully");
    handle.shutdown().await
}

pub async fn run_rest() -> anyhow::Result<()> {
    let cfg = RestConfig::from_env();
    tracing::info!(port = cfg.port, "BOOT wttr-gateway rest");
    run_until_signal(serve_rest(&cfg).await?).await
}

pub async fn run_mcp() -> anyhow::Result<()> {
    let cfg = McpConfig::from_env();
    tracing::info!(port = cfg.port, "BOOT wttr-gateway mcp");
    run_until_signal(serve_mcp(&cfg).await?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::UpstreamSettings;

    #[tokio::test]
    async fn serves_until_shutdown() {
        let cfg = McpConfig { port: 0, upstream: UpstreamSettings::mcp_defaults() };
        let handle = serve_mcp(&cfg).await.unwrap();
        let url = format!("http://127.0.0.1:{}/health", handle.local_addr().port());

        let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["status"], "healthy");

        handle.shutdown().await.unwrap();
        assert!(reqwest::get(&url).await.is_err());
    }
}
