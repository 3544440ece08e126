//! Strategies that turn an array and algorithm into a step trace.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Algorithm,
    protocol::{SortRequest, SortResult},
};
use tracing::debug;
use url::Url;

#[async_trait]
pub trait SortTraceProvider: Send + Sync {
    async fn fetch_trace(&self, array: &[u32], algorithm: Algorithm) -> Result<SortResult>;
}

pub struct MissingSortTraceProvider;

#[async_trait]
impl SortTraceProvider for MissingSortTraceProvider {
    async fn fetch_trace(&self, _array: &[u32], algorithm: Algorithm) -> Result<SortResult> {
        Err(anyhow!("no sort trace provider configured for {algorithm}"))
    }
}

/// Requests traces from a `POST /sort` endpoint.
pub struct HttpSortTraceProvider {
    http: Client,
    endpoint: Url,
}

impl HttpSortTraceProvider {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl SortTraceProvider for HttpSortTraceProvider {
    async fn fetch_trace(&self, array: &[u32], algorithm: Algorithm) -> Result<SortResult> {
        debug!(
            endpoint = %self.endpoint,
            %algorithm,
            len = array.len(),
            "trace: requesting sort trace"
        );
        let result: SortResult = self
            .http
            .post(self.endpoint.clone())
            .json(&SortRequest {
                array: array.to_vec(),
                algorithm,
            })
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.endpoint))?
            .error_for_status()?
            .json()
            .await
            .context("malformed sort response")?;
        debug!(steps = result.steps.len(), "trace: sort trace received");
        Ok(result)
    }
}

#[cfg(test)]
#[path = "tests/trace_tests.rs"]
mod tests;
