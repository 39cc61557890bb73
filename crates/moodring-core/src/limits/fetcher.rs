//! HTTP fetcher for the rate-limit endpoint.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use super::parser::parse_rate_limits;
use super::types::{FetchError, RateLimitRequest, RateSnapshot};
use crate::config::EndpointSettings;

/// Anything that can produce a fresh `RateSnapshot`.
///
/// `fetch` is blocking; async callers go through [`fetch_once`].
pub trait RateLimitSource: Send + Sync {
    fn fetch(&self) -> Result<RateSnapshot, FetchError>;
}

/// POSTs a fixed JSON body to the configured endpoint
pub struct HttpFetcher {
    agent: Agent,
    url: String,
    body: RateLimitRequest,
    headers: Vec<(String, String)>,
}

impl HttpFetcher {
    pub fn new(settings: &EndpointSettings) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(settings.timeout_secs.map(Duration::from_secs))
            .build();

        Self {
            agent: Agent::new_with_config(config),
            url: settings.url.clone(),
            body: RateLimitRequest {
                request_kind: settings.request_kind.clone(),
                model_name: settings.model_name.clone(),
            },
            headers: settings
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RateLimitSource for HttpFetcher {
    fn fetch(&self) -> Result<RateSnapshot, FetchError> {
        let mut request = self.agent.post(self.url.as_str());
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let mut response = request
            .send_json(&self.body)
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {}", status.as_u16())));
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        debug!("Rate limits: received {} bytes", body.len());
        parse_rate_limits(&body)
    }
}

/// Run one blocking fetch on the blocking pool.
///
/// A panicked or cancelled fetch task is reported as a network failure, so
/// nothing escapes this boundary except a `FetchError`.
pub async fn fetch_once(source: Arc<dyn RateLimitSource>) -> Result<RateSnapshot, FetchError> {
    match tokio::task::spawn_blocking(move || source.fetch()).await {
        Ok(result) => result,
        Err(e) => Err(FetchError::Network(format!("fetch task failed: {}", e))),
    }
}
