use reqwest::header::USER_AGENT;
use tracing::debug;

use crate::config::{self, ScrapeConfig};
use crate::error::{Result, ScrapeError};

/// One client shared by every static job.
pub fn build_client(config: &ScrapeConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|source| ScrapeError::Network {
            url: config.base_url.to_string(),
            source,
        })
}

/// GET `url` and return the body. Non-2xx statuses count as failures.
pub async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<String> {
    let network = |source: reqwest::Error| ScrapeError::Network {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(url)
        .header(USER_AGENT, config::USER_AGENT)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(network)?;

    let body = response.text().await.map_err(network)?;
    debug!(url, bytes = body.len(), "fetched page");
    Ok(body)
}
