//! Remote counter client
//!
//! HTTP client for the remote counting service:
//! `GET {base}/counter/{id}` returns the total as plain text,
//! `POST {base}/counter/{id}/increment` registers a visit (response body ignored).

use super::{classify, CounterService, RemoteError};
use async_trait::async_trait;
use reqwest::Client;

/// Configuration for the remote counter client
#[derive(Debug, Clone)]
pub struct CounterConfig {
    /// Base URL of the counting service
    pub base_url: String,
    /// Counter namespace for this site
    pub site_id: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            site_id: "homepage".to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Remote counter service over HTTP
pub struct HttpCounterClient {
    client: Client,
    config: CounterConfig,
}

impl HttpCounterClient {
    /// Create a new client with the given configuration
    pub fn new(config: CounterConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    fn counter_url(&self) -> String {
        format!("{}/counter/{}", self.config.base_url, self.config.site_id)
    }
}

#[async_trait]
impl CounterService for HttpCounterClient {
    async fn fetch(&self) -> Result<u64, RemoteError> {
        let response = self
            .client
            .get(self.counter_url())
            .send()
            .await
            .map_err(classify)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api { status, message });
        }

        let body = response.text().await.map_err(RemoteError::Request)?;
        body.trim()
            .parse()
            .map_err(|_| RemoteError::Parse(format!("not a counter value: {body:?}")))
    }

    async fn increment(&self) -> Result<(), RemoteError> {
        let url = format!("{}/increment", self.counter_url());

        let response = self.client.post(url).send().await.map_err(classify)?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(RemoteError::Api { status, message })
        }
    }
}
