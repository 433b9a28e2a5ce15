//! Runs the REST and RPC gateways as child processes of one supervisor.
//!
//! - Signals (SIGTERM/SIGINT) are forwarded to both children; if they are not
//!   both gone after the grace period they are killed and the supervisor exits 1.
//! - A child exiting on its own takes the other one down, and its exit code
//!   becomes the supervisor's.

use std::path::PathBuf;
use std::process::ExitStatus;

use anyhow::Context;
use tokio::process::{Child, Command};

use crate::infra::config::SupervisorConfig;
use crate::infra::signals::{wait_for_termination, Termination};

/// Exit code used when the children had to be force-killed.
pub const FORCED_EXIT: i32 = 1;

/// How to launch one gateway child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSpec {
    pub name: &'static str,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl ChildSpec {
    fn spawn(&self) -> anyhow::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawning {} ({})", self.name, self.program.display()))
    }
}

/// Child specs that re-run this binary with the `rest` / `mcp` subcommands.
pub fn gateway_children(program: PathBuf, cfg: &SupervisorConfig) -> [ChildSpec; 2] {
    [
        ChildSpec {
            name: "api",
            program: program.clone(),
            args: vec!["rest".into()],
            env: vec![("PORT".into(), cfg.api_port.to_string())],
        },
        ChildSpec {
            name: "mcp",
            program,
            args: vec!["mcp".into()],
            env: vec![("MCP_PORT".into(), cfg.mcp_port.to_string())],
        },
    ]
}

/// Exit code of a child that stopped by itself; signal deaths count as 1.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(FORCED_EXIT)
}

#[cfg(unix)]
fn forward(child: &Child, name: &str, sig: Termination) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id().and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    if let Err(e) = kill(Pid::from_raw(pid), Signal::from(sig)) {
        tracing::warn!(child = name, error = %e, "failed to forward signal");
    }
}

#[cfg(not(unix))]
fn forward(child: &mut Child, name: &str, _sig: Termination) {
    if let Err(e) = child.start_kill() {
        tracing::warn!(child = name, error = %e, "failed to stop child");
    }
}

async fn kill_and_reap(child: &mut Child, name: &str) {
    if let Err(e) = child.kill().await {
        tracing::debug!(child = name, error = %e, "kill failed (already exited?)");
    }
}

/// Supervise two already-built child specs until one exits or a signal arrives.
pub async fn supervise(specs: [ChildSpec; 2], grace: std::time::Duration) -> anyhow::Result<i32> {
    let [api_spec, mcp_spec] = specs;
    let mut api = api_spec.spawn()?;
    let mut mcp = match mcp_spec.spawn() {
        Ok(c) => c,
        Err(e) => {
            kill_and_reap(&mut api, api_spec.name).await;
            return Err(e);
        }
    };

    tokio::select! {
        sig = wait_for_termination() => {
            let sig = sig?;
            tracing::info!(signal = sig.name(), "Received signal, shutting down gracefully");
            #[cfg(unix)]
            {
                forward(&api, api_spec.name, sig);
                forward(&mcp, mcp_spec.name, sig);
            }
            #[cfg(not(unix))]
            {
                forward(&mut api, api_spec.name, sig);
                forward(&mut mcp, mcp_spec.name, sig);
            }
            let both = async {
                let a = api.wait().await;
                let m = mcp.wait().await;
                (a, m)
            };
            match tokio::time::timeout(grace, both).await {
                Ok((a, m)) => {
                    tracing::info!(api = ?a.ok(), mcp = ?m.ok(), "children stopped");
                    Ok(0)
                }
                Err(_) => {
                    tracing::warn!("Force killing processes");
                    kill_and_reap(&mut api, api_spec.name).await;
                    kill_and_reap(&mut mcp, mcp_spec.name).await;
                    Ok(FORCED_EXIT)
                }
            }
        }
        status = api.wait() => {
            let status = status?;
            tracing::error!(child = api_spec.name, status = %status, "API server exited");
            kill_and_reap(&mut mcp, mcp_spec.name).await;
            Ok(exit_code_of(status))
        }
        status = mcp.wait() => {
            let status = status?;
            tracing::error!(child = mcp_spec.name, status = %status, "MCP server exited");
            kill_and_reap(&mut api, api_spec.name).await;
            Ok(exit_code_of(status))
        }
    }
}

/// Entry point for `wttr-gateway start`.
pub async fn run() -> anyhow::Result<i32> {
    let cfg = SupervisorConfig::from_env();
    let program = std::env::current_exe().context("locating own executable")?;
    tracing::info!("Starting Weather Proxy Services");
    tracing::info!("HTTP API: http://localhost:{}", cfg.api_port);
    tracing::info!("MCP Server: http://localhost:{}", cfg.mcp_port);
    tracing::info!("API Docs: http://localhost:{}/docs", cfg.api_port);
    tracing::info!(
        "Health Checks: http://localhost:{}/health, http://localhost:{}/health",
        cfg.api_port,
        cfg.mcp_port
    );
    supervise(gateway_children(program, &cfg), cfg.grace).await
}
