use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::infra::config::{parse_file_config, McpConfig, RestConfig, SupervisorConfig};

#[derive(Parser)]
#[command(name = "wttr-gateway")]
#[command(about = "wttr.in weather proxy - REST gateway, MCP gateway and supervisor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the REST gateway (PORT, default 3000)
    Rest,
    /// Run the MCP JSON-RPC gateway (MCP_PORT, default 3001)
    Mcp,
    /// Start both gateways as supervised child processes
    Start,
    /// Health check a running gateway
    Health {
        /// Gateway base URL to check
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
    /// Validate configuration and print the resolved settings
    Config,
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    run_commands(cli.command).await
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Rest => report(crate::infra::boot::run_rest().await),
        Commands::Mcp => report(crate::infra::boot::run_mcp().await),
        Commands::Start => match crate::infra::supervisor::run().await {
            Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "supervisor failed");
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config => match validate_config() {
            Ok(summary) => {
                println!("{summary}");
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn report(res: anyhow::Result<()>) -> ExitCode {
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", url.trim_end_matches('/')))
        .timeout(std::time::Duration::from_secs(2))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<String, Box<dyn std::error::Error>> {
    // Unlike the gateways, which fall back to defaults, validation is strict.
    if let Ok(path) = std::env::var("WTTR_GATEWAY_CONFIG") {
        let raw = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
        parse_file_config(&raw).map_err(|e| format!("{path}: {e}"))?;
    }
    for key in ["PORT", "MCP_PORT", "API_PORT"] {
        if let Ok(v) = std::env::var(key) {
            match v.parse::<u16>() {
                Ok(0) => return Err(format!("{key} cannot be 0").into()),
                Ok(_) => {}
                Err(_) => return Err(format!("Invalid {key}: {v}").into()),
            }
        }
    }

    let rest = RestConfig::from_env();
    let mcp = McpConfig::from_env();
    let sup = SupervisorConfig::from_env();
    Ok(format!(
        "📋 Configuration:\n  REST: port {} -> {} (timeout {:?}, ua {})\n  \
         MCP:  port {} -> {} (timeout {:?}, ua {})\n  Supervisor: api {} / mcp {}",
        rest.port,
        rest.upstream.base_url,
        rest.upstream.timeout,
        rest.upstream.user_agent,
        mcp.port,
        mcp.upstream.base_url,
        mcp.upstream.timeout,
        mcp.upstream.user_agent,
        sup.api_port,
        sup.mcp_port,
    ))
}
