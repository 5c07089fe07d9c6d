//! YouTube Data API client
//!
//! Resolves a video id to title, channel and duration via `videos.list`.
//! Lookups never fail the caller: `resolve_metadata` logs and degrades to
//! `None`.

use async_trait::async_trait;
use mixer_common::links::extract_video_id;
use mixer_common::models::UNKNOWN_GENRE;
use mixer_common::VideoMetadata;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const YOUTUBE_VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";
const USER_AGENT: &str = concat!("mixer-bot/", env!("CARGO_PKG_VERSION"));

/// Minutes and seconds only; an hours component is not captured.
static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"PT(?:(\d+)M)?(?:(\d+)S)?")
        .expect("duration pattern is valid")
});

/// YouTube client errors
#[derive(Debug, Error)]
pub enum YouTubeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Anything that can look up video metadata by id
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// `Ok(None)` when the video does not exist
    async fn lookup_video(&self, video_id: &str) -> Result<Option<VideoMetadata>, YouTubeError>;
}

/// `videos.list` response
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub snippet: VideoSnippet,
    pub content_details: ContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentDetails {
    #[serde(default)]
    pub duration: String,
}

impl From<VideoItem> for VideoMetadata {
    fn from(item: VideoItem) -> Self {
        VideoMetadata {
            title: item.snippet.title,
            artist: item.snippet.channel_title,
            album: None,
            genre: item
                .snippet
                .category_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| UNKNOWN_GENRE.to_string()),
            duration_seconds: parse_iso_duration(&item.content_details.duration),
        }
    }
}

/// Parse an ISO-8601 duration into whole seconds.
///
/// Only the minute and second components are read: `PT3M0S` is 180 but
/// `PT1H2M3S` is 0 because the pattern stops at the hour field.
pub fn parse_iso_duration(iso: &str) -> i64 {
    let Some(caps) = ISO_DURATION.captures(iso) else {
        return 0;
    };

    let component = |idx: usize| {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(0)
    };

    component(1) * 60 + component(2)
}

/// YouTube Data API v3 client (API key auth)
pub struct YouTubeClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Result<Self, YouTubeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| YouTubeError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: YOUTUBE_VIDEOS_URL.to_string(),
        })
    }
}

#[async_trait]
impl MetadataSource for YouTubeClient {
    async fn lookup_video(&self, video_id: &str) -> Result<Option<VideoMetadata>, YouTubeError> {
        tracing::debug!(video_id = %video_id, "Querying YouTube videos.list");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| YouTubeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(YouTubeError::ApiError(status.as_u16(), error_text));
        }

        let list: VideoListResponse = response
            .json()
            .await
            .map_err(|e| YouTubeError::ParseError(e.to_string()))?;

        let metadata = list.items.into_iter().next().map(VideoMetadata::from);

        if let Some(meta) = &metadata {
            tracing::info!(
                video_id = %video_id,
                title = %meta.title,
                channel = %meta.artist,
                "Retrieved video metadata"
            );
        }

        Ok(metadata)
    }
}

/// Look up metadata for a YouTube URL, degrading to `None` on any miss.
pub async fn resolve_metadata(source: &dyn MetadataSource, url: &str) -> Option<VideoMetadata> {
    let Some(video_id) = extract_video_id(url) else {
        tracing::debug!(url = %url, "No video id in link");
        return None;
    };

    match source.lookup_video(&video_id).await {
        Ok(Some(metadata)) => Some(metadata),
        Ok(None) => {
            tracing::info!(video_id = %video_id, "No metadata found for video");
            None
        }
        Err(e) => {
            tracing::warn!(video_id = %video_id, error = %e, "YouTube metadata fetch failed");
            None
        }
    }
}
