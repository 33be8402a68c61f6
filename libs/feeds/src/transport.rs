//! HTTP transport seam
//!
//! Every network call made by the relay and the source clients goes through
//! [`HttpTransport`], so the whole fetch cascade can run against a scripted
//! transport in tests.

use crate::error::{FeedError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("market-pulse/", env!("CARGO_PKG_VERSION"));

/// Minimal JSON-over-HTTP interface
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url` and parse the body as JSON
    async fn get_json(&self, url: &str) -> Result<Value>;

    /// POST `body` as JSON to `url` and parse the answer as JSON
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value>;
}

/// Production transport backed by a shared reqwest client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    async fn read_json(url: &str, response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| FeedError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_json(url, response).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        Self::read_json(url, response).await
    }
}
