pub mod darksky;
pub mod eventbrite;
pub mod geocode;
pub mod tmdb;
pub mod yelp;

use thiserror::Error;

/// Build a shared HTTP client with reasonable defaults for provider calls.
/// Reused across all clients so connections are pooled instead of opened
/// per request.
pub fn build_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("cityscout/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} API error: {status} - {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
}

impl ProviderError {
    #[must_use]
    pub const fn service(&self) -> &'static str {
        match self {
            Self::Transport { service, .. } | Self::Status { service, .. } => service,
        }
    }
}

/// Reject non-2xx provider responses with the status and body preserved
/// for the server-side log.
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        service,
        status,
        body,
    })
}
