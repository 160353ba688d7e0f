use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{DurationFilter, FetchError, Stage, Video},
    infrastructure::cancel::CancelToken,
};

use super::{
    catalog::{VideoCatalog, VideoItem},
    duration::parse_duration,
};

/// Quota units charged per `search.list` call.
pub const QUOTA_COST_SEARCH: u64 = 100;
/// Quota units charged per `videos.list` call, independent of how many ids it carries.
pub const QUOTA_COST_VIDEOS: u64 = 1;
/// Most ids a single `videos.list` call accepts.
pub const MAX_VIDEOS_PER_REQUEST: usize = 50;

/// Search side of the pipeline, as seen by its callers.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Searches with the `short` duration bucket and hydrates every hit.
    async fn search(
        &self,
        query: &str,
        max_results: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<Video>, FetchError>;

    fn quota_used(&self) -> u64;
}

/// Cumulative quota consumption. Only ever grows.
#[derive(Debug, Default)]
pub struct QuotaCounter(AtomicU64);

impl QuotaCounter {
    pub fn charge(&self, units: u64) {
        self.0.fetch_add(units, Ordering::SeqCst);
    }

    pub fn used(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Catalog client that meters every successful call.
pub struct SearchClient {
    catalog: Arc<dyn VideoCatalog>,
    quota: QuotaCounter,
}

impl SearchClient {
    pub fn new(catalog: Arc<dyn VideoCatalog>) -> Self {
        Self {
            catalog,
            quota: QuotaCounter::default(),
        }
    }

    pub async fn search_with_duration(
        &self,
        query: &str,
        max_results: u32,
        duration: DurationFilter,
        cancel: &CancelToken,
    ) -> Result<Vec<Video>, FetchError> {
        validate_search(query, max_results)?;

        let response = cancel
            .run(
                Stage::Search,
                self.catalog.search_list(query, max_results, duration),
            )
            .await?;
        self.quota.charge(QUOTA_COST_SEARCH);

        let ids: Vec<String> = response
            .items
            .into_iter()
            .filter_map(|item| item.id.and_then(|id| id.video_id))
            .filter(|id| !id.is_empty())
            .collect();

        tracing::debug!(
            target: "search",
            query,
            %duration,
            hits = ids.len(),
            quota_used = self.quota.used(),
            "search completed"
        );

        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_details(&ids, cancel).await
    }

    /// Hydrates `ids` in batches of [`MAX_VIDEOS_PER_REQUEST`]. The first failing
    /// batch fails the whole call; nothing fetched before it is returned.
    pub async fn fetch_details(
        &self,
        ids: &[String],
        cancel: &CancelToken,
    ) -> Result<Vec<Video>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let batches = ids.len().div_ceil(MAX_VIDEOS_PER_REQUEST);
        let mut videos = Vec::with_capacity(ids.len());

        for (idx, batch) in ids.chunks(MAX_VIDEOS_PER_REQUEST).enumerate() {
            let response = match cancel
                .run(Stage::Details, self.catalog.videos_list(batch))
                .await
            {
                Ok(response) => response,
                Err(FetchError::Transport { error, .. }) => {
                    tracing::warn!(
                        target: "search",
                        batch = idx + 1,
                        batches,
                        error = %error,
                        "details batch failed; aborting"
                    );
                    return Err(FetchError::UpstreamBatch {
                        batch: idx + 1,
                        batches,
                        error,
                    });
                }
                Err(err) => return Err(err),
            };
            self.quota.charge(QUOTA_COST_VIDEOS);
            videos.extend(response.items.into_iter().map(convert_video));
        }

        tracing::debug!(
            target: "search",
            requested = ids.len(),
            hydrated = videos.len(),
            batches,
            quota_used = self.quota.used(),
            "details fetched"
        );
        Ok(videos)
    }

    pub fn quota_used(&self) -> u64 {
        self.quota.used()
    }
}

#[async_trait]
impl VideoSearch for SearchClient {
    async fn search(
        &self,
        query: &str,
        max_results: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<Video>, FetchError> {
        self.search_with_duration(query, max_results, DurationFilter::Short, cancel)
            .await
    }

    fn quota_used(&self) -> u64 {
        self.quota.used()
    }
}

pub(crate) fn validate_search(query: &str, max_results: u32) -> Result<(), FetchError> {
    if query.trim().is_empty() {
        return Err(FetchError::InvalidArgument("query cannot be empty"));
    }
    if max_results == 0 {
        return Err(FetchError::InvalidArgument("max results must be positive"));
    }
    Ok(())
}

fn convert_video(item: VideoItem) -> Video {
    let mut video = Video {
        id: item.id,
        ..Default::default()
    };

    if let Some(snippet) = item.snippet {
        video.title = snippet.title;
        video.description = snippet.description;
        video.channel = snippet.channel_title;
        video.channel_id = snippet.channel_id;
        video.published_at = DateTime::parse_from_rfc3339(&snippet.published_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc));
    }

    if let Some(stats) = item.statistics {
        video.view_count = stats.view_count;
        video.like_count = stats.like_count;
        video.comment_count = stats.comment_count;
    }

    if let Some(details) = item.content_details {
        video.duration_secs = parse_duration(&details.duration);
    }

    video
}
