//! Search fallback for profile key resolution.
//!
//! One Custom Search query per fighter: the display name plus the word
//! `sherdog`. The first result hosted on sherdog.com wins; its trailing
//! path segment is already the canonical `First-Last-12345` key.

use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::http::HttpClient;
use crate::sources::SearchPath;

static KEY_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\d+$").unwrap());

pub struct GoogleSearch {
    http: HttpClient,
    endpoint: String,
    api_key: String,
    engine_id: String,
}

impl GoogleSearch {
    pub fn new(http: HttpClient, api_key: String, engine_id: String) -> Self {
        Self::with_endpoint(http, api_key, engine_id, "https://www.googleapis.com")
    }

    pub fn with_endpoint(
        http: HttpClient,
        api_key: String,
        engine_id: String,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key,
            engine_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

#[async_trait]
impl SearchPath for GoogleSearch {
    async fn search_key(&self, name: &str) -> anyhow::Result<String> {
        let url = format!("{}/customsearch/v1", self.endpoint);
        let query = format!("{name} sherdog");
        let response: SearchResponse = self
            .http
            .get_json(
                &url,
                &[
                    ("q", query.as_str()),
                    ("key", self.api_key.as_str()),
                    ("cx", self.engine_id.as_str()),
                ],
            )
            .await?;

        let link = response
            .items
            .iter()
            .find(|item| item.link.contains("sherdog.com"))
            .with_context(|| format!("no sherdog result for {name:?}"))?;

        key_from_profile_url(&link.link)
    }
}

/// Take the trailing `First-Last-12345` segment of a profile URL.
pub(crate) fn key_from_profile_url(link: &str) -> anyhow::Result<String> {
    let url = Url::parse(link).with_context(|| format!("unparseable result link: {link}"))?;
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .with_context(|| format!("result link has no path: {link}"))?;

    if !KEY_SUFFIX.is_match(segment) {
        anyhow::bail!("result link is not a profile page: {link}");
    }
    Ok(segment.to_string())
}
