use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_API_PORT: u16 = 3000;
pub const DEFAULT_MCP_PORT: u16 = 3001;
pub const DEFAULT_WTTR_BASE_URL: &str = "https://wttr.in";

/// How one gateway talks to the upstream weather service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Metric label for this surface ("rest" / "mcp").
    pub label: &'static str,
}

impl UpstreamSettings {
    pub fn rest_defaults() -> Self {
        Self {
            base_url: DEFAULT_WTTR_BASE_URL.into(),
            timeout: Duration::from_secs(10),
            max_redirects: 5,
            user_agent: "wttr-proxy/1.0.0".into(),
            label: "rest",
        }
    }

    pub fn mcp_defaults() -> Self {
        Self {
            base_url: DEFAULT_WTTR_BASE_URL.into(),
            timeout: Duration::from_secs(30),
            max_redirects: 5,
            user_agent: "weather-mcp-server/0.1.0".into(),
            label: "mcp",
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn apply(mut self, base_url: Option<&String>, profile: Option<&ProfileOverrides>) -> Self {
        if let Some(base) = base_url.filter(|b| !b.trim().is_empty()) {
            self.base_url = base.clone();
        }
        if let Some(p) = profile {
            if let Some(secs) = p.timeout_secs {
                self.timeout = Duration::from_secs(secs);
            }
            if let Some(n) = p.max_redirects {
                self.max_redirects = n;
            }
            if let Some(ua) = &p.user_agent {
                self.user_agent = ua.clone();
            }
        }
        self
    }
}

/// Optional TOML file named by `WTTR_GATEWAY_CONFIG`.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub rest: Option<ProfileOverrides>,
    pub mcp: Option<ProfileOverrides>,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ProfileOverrides {
    pub timeout_secs: Option<u64>,
    pub max_redirects: Option<usize>,
    pub user_agent: Option<String>,
}

pub fn parse_file_config(raw: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(raw)
}

fn load_file_config() -> FileConfig {
    let Ok(path) = std::env::var("WTTR_GATEWAY_CONFIG") else {
        return FileConfig::default();
    };
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "config file unreadable; using defaults");
            return FileConfig::default();
        }
    };
    parse_file_config(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %path, error = %e, "config file invalid; using defaults");
        FileConfig::default()
    })
}

fn env_port(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_base_url() -> Option<String> {
    std::env::var("WTTR_BASE_URL").ok().filter(|b| !b.trim().is_empty())
}

/// REST gateway process configuration.
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub port: u16,
    pub upstream: UpstreamSettings,
}

impl RestConfig {
    pub fn from_env() -> Self {
        let file = load_file_config();
        let mut upstream =
            UpstreamSettings::rest_defaults().apply(file.base_url.as_ref(), file.rest.as_ref());
        if let Some(base) = env_base_url() {
            upstream.base_url = base;
        }
        Self { port: env_port("PORT", DEFAULT_API_PORT), upstream }
    }
}

/// RPC gateway process configuration.
#[derive(Debug, Clone)]
pub struct McpConfig {
    pub port: u16,
    pub upstream: UpstreamSettings,
}

impl McpConfig {
    pub fn from_env() -> Self {
        let file = load_file_config();
        let mut upstream =
            UpstreamSettings::mcp_defaults().apply(file.base_url.as_ref(), file.mcp.as_ref());
        if let Some(base) = env_base_url() {
            upstream.base_url = base;
        }
        Self { port: env_port("MCP_PORT", DEFAULT_MCP_PORT), upstream }
    }
}

/// Supervisor configuration: the ports handed to each child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub api_port: u16,
    pub mcp_port: u16,
    pub grace: Duration,
}

impl SupervisorConfig {
    pub fn from_env() -> Self {
        Self {
            api_port: env_port("API_PORT", DEFAULT_API_PORT),
            mcp_port: env_port("MCP_PORT", DEFAULT_MCP_PORT),
            grace: Duration::from_secs(5),
        }
    }
}
