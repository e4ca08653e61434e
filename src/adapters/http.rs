use crate::config::{FETCH_TIMEOUT, PROBE_TIMEOUT, USER_AGENT};
use crate::domain::ports::WebClient;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// Builds the shared client with the fixed browser-like headers.
pub fn build_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(USER_AGENT),
    );

    let client = Client::builder().default_headers(headers).build()?;
    Ok(client)
}

#[derive(Debug, Clone)]
pub struct HttpWebClient {
    client: Client,
    probe_timeout: Duration,
    fetch_timeout: Duration,
}

impl HttpWebClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            probe_timeout: PROBE_TIMEOUT,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, probe_timeout: Duration, fetch_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self.fetch_timeout = fetch_timeout;
        self
    }
}

#[async_trait]
impl WebClient for HttpWebClient {
    async fn is_accessible(&self, url: &str) -> bool {
        match self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => {
                tracing::debug!("Probe {} -> {}", url, response.status());
                response.status().is_success()
            }
            Err(e) => {
                tracing::debug!("Probe {} failed: {}", url, e);
                false
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}
