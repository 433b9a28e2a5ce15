use std::time::Instant;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::domain::WeatherQuery;
use crate::infra::config::UpstreamSettings;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client_with;

/// How an upstream lookup failed. `Display` is the text surfaced to RPC callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Request failed with status code 404")]
    NotFound,
    #[error("upstream request timed out")]
    Timeout,
    #[error("Request failed with status code {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}

/// Single-shot client for `GET {base}/{location}?format=j1`. Never retries.
#[derive(Clone)]
pub struct WttrClient {
    base: String,
    http: Client,
    user_agent: String,
    label: &'static str,
}

impl WttrClient {
    pub fn new(settings: &UpstreamSettings) -> Self {
        Self {
            base: settings.base_url.clone(),
            http: make_http_client_with(settings),
            user_agent: settings.user_agent.clone(),
            label: settings.label,
        }
    }

    pub fn proxied_url(&self, query: &WeatherQuery) -> String {
        format!(
            "{}/{}?format={}",
            self.base.trim_end_matches('/'),
            urlencoding::encode(query.location()),
            query.format()
        )
    }

    /// Fetch the raw upstream body. Any non-2xx status is an error.
    pub async fn fetch(&self, query: &WeatherQuery) -> Result<String, UpstreamError> {
        let url = self.proxied_url(query);
        tracing::info!(url = %url, "Proxying request");
        let start = Instant::now();
        let res = self.fetch_once(&url).await;
        match &res {
            Ok(_) => {
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                crate::infra::logging::log_metric(self.label, "upstream_latency_ms", elapsed_ms);
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Error fetching weather data");
                crate::infra::logging::count(self.label, "upstream_error_total");
            }
        }
        res
    }

    async fn fetch_once(&self, url: &str) -> Result<String, UpstreamError> {
        let (builder, _rid) = add_standard_headers(self.http.get(url), &self.user_agent, None);
        let resp = builder.send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(UpstreamError::NotFound),
            s if !s.is_success() => Err(UpstreamError::Status(s.as_u16())),
            _ => Ok(resp.text().await?),
        }
    }
}
