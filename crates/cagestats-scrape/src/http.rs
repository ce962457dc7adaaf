//! Shared HTTP client for all scrape sources.

use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Thin wrapper around a pooled reqwest client.
///
/// Built once per run and handed to every source, so timeout and user
/// agent are decided in one place and nothing reaches for an ambient
/// singleton. Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// GET a page as text. Non-success statuses are errors.
    pub async fn get_text(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("request rejected: {url}"))?;
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read body: {url}"))?;
        Ok(body)
    }

    /// GET a JSON document and deserialize it. Query parameters are
    /// passed separately so credentials never end up in error messages.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("request rejected: {url}"))?;
        let value = response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode response: {url}"))?;
        Ok(value)
    }
}
