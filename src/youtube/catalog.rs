use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use crate::{
    domain::{DurationFilter, FetchError, TransportError},
    infrastructure::http::ensure_success,
};

/// Largest `maxResults` the search endpoint accepts.
pub const MAX_SEARCH_RESULTS: u32 = 50;

/// Raw access to the video catalog. Implementations issue exactly one
/// remote call per method invocation and do no bookkeeping.
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    async fn search_list(
        &self,
        query: &str,
        max_results: u32,
        duration: DurationFilter,
    ) -> Result<SearchListResponse, TransportError>;

    async fn videos_list(&self, ids: &[String]) -> Result<VideoListResponse, TransportError>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    pub id: Option<ResourceId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub snippet: Option<VideoSnippet>,
    pub statistics: Option<VideoStatistics>,
    pub content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: String,
}

/// Counters arrive as decimal strings; absent or malformed ones read as 0.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoStatistics {
    #[serde(deserialize_with = "count")]
    pub view_count: u64,
    #[serde(deserialize_with = "count")]
    pub like_count: u64,
    #[serde(deserialize_with = "count")]
    pub comment_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VideoContentDetails {
    pub duration: String,
}

fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s.trim().parse().unwrap_or(0),
        Raw::Other(_) => 0,
    })
}

/// YouTube Data API v3 over HTTPS.
pub struct HttpCatalog {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HttpCatalog {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, FetchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FetchError::InvalidArgument("API key cannot be empty"));
        }
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl VideoCatalog for HttpCatalog {
    async fn search_list(
        &self,
        query: &str,
        max_results: u32,
        duration: DurationFilter,
    ) -> Result<SearchListResponse, TransportError> {
        let max_results = max_results.min(MAX_SEARCH_RESULTS).to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("part", "id"),
            ("type", "video"),
            ("order", "viewCount"),
            ("q", query),
            ("maxResults", max_results.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(bucket) = duration.as_param() {
            params.push(("videoDuration", bucket));
        }

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&params)
            .send()
            .await?;
        let body = ensure_success(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn videos_list(&self, ids: &[String]) -> Result<VideoListResponse, TransportError> {
        let joined = ids.join(",");
        let response = self
            .http
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet,statistics,contentDetails"),
                ("id", joined.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let body = ensure_success(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
