//! Fight video enrichment through the YouTube Data API.
//!
//! One search per fighter: the display name plus `full fight`. Results
//! are scanned in order; only real videos count (the API interleaves
//! channels and playlists), and collection stops at five. Which of the
//! two credentials signs the request is decided by the caller's quota
//! partition.

use async_trait::async_trait;
use serde::Deserialize;

use cagestats::models::QuotaPartition;

use crate::http::HttpClient;
use crate::sources::VideoSource;

/// Cap on attached video links per fighter.
pub const MAX_VIDEOS: usize = 5;

/// Result kind marking an actual video.
const VIDEO_KIND: &str = "youtube#video";

pub struct YoutubeVideos {
    http: HttpClient,
    endpoint: String,
    key_primary: String,
    key_secondary: String,
}

impl YoutubeVideos {
    pub fn new(http: HttpClient, key_primary: String, key_secondary: String) -> Self {
        Self::with_endpoint(http, key_primary, key_secondary, "https://www.googleapis.com")
    }

    pub fn with_endpoint(
        http: HttpClient,
        key_primary: String,
        key_secondary: String,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            key_primary,
            key_secondary,
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
    id: ItemId,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(default)]
    kind: String,
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[async_trait]
impl VideoSource for YoutubeVideos {
    async fn fighter_videos(
        &self,
        name: &str,
        partition: QuotaPartition,
    ) -> anyhow::Result<Vec<String>> {
        let key = match partition {
            QuotaPartition::Primary => &self.key_primary,
            QuotaPartition::Secondary => &self.key_secondary,
        };

        let url = format!("{}/youtube/v3/search", self.endpoint);
        let query = format!("{name} full fight");
        let response: SearchResponse = self
            .http
            .get_json(
                &url,
                &[
                    ("part", "snippet"),
                    ("maxResults", "50"),
                    ("regionCode", "PL"),
                    ("q", query.as_str()),
                    ("key", key.as_str()),
                ],
            )
            .await?;

        Ok(watch_links(&response.items))
    }
}

/// Keep the first [`MAX_VIDEOS`] real videos, in result order.
fn watch_links(items: &[SearchItem]) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.id.kind == VIDEO_KIND)
        .filter_map(|item| item.id.video_id.as_deref())
        .take(MAX_VIDEOS)
        .map(|id| format!("https://www.youtube.com/watch?v={id}"))
        .collect()
}

/// Video source used when no credentials are configured: every lookup
/// yields an empty list and fighters are published without videos.
pub struct NoVideos;

#[async_trait]
impl VideoSource for NoVideos {
    async fn fighter_videos(
        &self,
        _name: &str,
        _partition: QuotaPartition,
    ) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str) -> SearchItem {
        SearchItem {
            id: ItemId {
                kind: VIDEO_KIND.to_string(),
                video_id: Some(id.to_string()),
            },
        }
    }

    fn channel() -> SearchItem {
        SearchItem {
            id: ItemId {
                kind: "youtube#channel".to_string(),
                video_id: None,
            },
        }
    }

    #[test]
    fn scan_keeps_five_videos_in_order_skipping_non_videos() {
        // Eight qualifying items with two non-qualifying ones interleaved.
        let items = vec![
            video("a"),
            channel(),
            video("b"),
            video("c"),
            channel(),
            video("d"),
            video("e"),
            video("f"),
            video("g"),
            video("h"),
        ];

        let links = watch_links(&items);
        assert_eq!(
            links,
            vec![
                "https://www.youtube.com/watch?v=a",
                "https://www.youtube.com/watch?v=b",
                "https://www.youtube.com/watch?v=c",
                "https://www.youtube.com/watch?v=d",
                "https://www.youtube.com/watch?v=e",
            ]
        );
    }

    #[test]
    fn fewer_than_five_videos_returns_what_there_is() {
        let items = vec![video("a"), channel(), video("b")];
        assert_eq!(watch_links(&items).len(), 2);
    }

    #[test]
    fn search_response_deserializes_api_shape() {
        let response: SearchResponse = serde_json::from_str(
            r#"{
                "items": [
                    {"id": {"kind": "youtube#video", "videoId": "dQw4w9WgXcQ"}},
                    {"id": {"kind": "youtube#channel", "channelId": "UC123"}}
                ]
            }"#,
        )
        .unwrap();
        let links = watch_links(&response.items);
        assert_eq!(links, vec!["https://www.youtube.com/watch?v=dQw4w9WgXcQ"]);
    }

    #[test]
    fn empty_response_yields_no_links() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(watch_links(&response.items).is_empty());
    }
}
