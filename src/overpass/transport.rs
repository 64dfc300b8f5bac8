//! HTTP transport to Overpass interpreters.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{Endpoint, FetchError};

/// Raw HTTP answer from an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam used by the discovery coordinator
#[async_trait]
pub trait Transport: Send + Sync {
    /// Lightweight reachability check; any HTTP answer counts as reachable
    async fn probe(&self, url: &str, timeout: Duration) -> Result<(), FetchError>;

    /// POST a compiled query to one endpoint
    async fn execute(
        &self,
        endpoint: &Endpoint,
        query: &str,
        timeout: Duration,
    ) -> Result<TransportResponse, FetchError>;
}

/// `reqwest`-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    fn classify(err: reqwest::Error, timeout: Duration) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else {
            FetchError::from(err)
        }
    }
}

/// `application/x-www-form-urlencoded` body carrying the query as `data`
fn form_body(query: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("data", query)
        .finish()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn probe(&self, url: &str, timeout: Duration) -> Result<(), FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::classify(e, timeout))?;

        debug!("Probe {} answered {}", url, response.status());
        Ok(())
    }

    async fn execute(
        &self,
        endpoint: &Endpoint,
        query: &str,
        timeout: Duration,
    ) -> Result<TransportResponse, FetchError> {
        let response = self
            .client
            .post(&endpoint.url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form_body(query))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::classify(e, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::classify(e, timeout))?;

        Ok(TransportResponse { status, body })
    }
}
