use reqwest::redirect::Policy;

use crate::infra::config::UpstreamSettings;

/// Build a reqwest client for one upstream profile (total timeout, bounded redirects).
pub fn make_http_client_with(settings: &UpstreamSettings) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(settings.timeout)
        .redirect(Policy::limited(settings.max_redirects))
        .build()
        .expect("reqwest client")
}
