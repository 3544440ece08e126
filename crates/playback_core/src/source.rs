//! Strategies that supply the array to be sorted.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use shared::{
    domain::{MAX_ARRAY_VALUE, MIN_ARRAY_VALUE},
    protocol::{GenerateQuery, GenerateResponse},
};
use tracing::debug;
use url::Url;

#[async_trait]
pub trait ArraySource: Send + Sync {
    /// Produces a fresh array of `size` elements. The caller has already
    /// checked `size` against the allowed range.
    async fn generate(&self, size: usize) -> Result<Vec<u32>>;
}

/// Generates arrays in-process with values drawn uniformly from `1..=100`.
pub struct LocalArraySource;

#[async_trait]
impl ArraySource for LocalArraySource {
    async fn generate(&self, size: usize) -> Result<Vec<u32>> {
        let mut rng = rand::thread_rng();
        let array = (0..size)
            .map(|_| rng.gen_range(MIN_ARRAY_VALUE..=MAX_ARRAY_VALUE))
            .collect();
        Ok(array)
    }
}

/// Fetches arrays from a `GET /generate?size=N` endpoint.
pub struct RemoteArraySource {
    http: Client,
    endpoint: Url,
}

impl RemoteArraySource {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ArraySource for RemoteArraySource {
    async fn generate(&self, size: usize) -> Result<Vec<u32>> {
        debug!(endpoint = %self.endpoint, size, "source: requesting array");
        let body: GenerateResponse = self
            .http
            .get(self.endpoint.clone())
            .query(&GenerateQuery { size })
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.endpoint))?
            .error_for_status()?
            .json()
            .await
            .context("malformed generate response")?;

        // The server substitutes its own default for sizes it rejects.
        if body.array.len() != size {
            return Err(anyhow!(
                "generate endpoint returned {} elements, requested {size}",
                body.array.len()
            ));
        }
        if body.array.iter().any(|&value| value == 0) {
            return Err(anyhow!("generate endpoint returned a non-positive value"));
        }
        Ok(body.array)
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
