use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest runtime, in seconds, that the Shorts format allows.
pub const SHORTS_MAX_DURATION_SECS: u32 = 60;

/// A candidate video with the metadata hydrated from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub channel: String,
    pub channel_id: String,
    pub published_at: Option<DateTime<Utc>>,
    pub duration_secs: u32,
}

impl Video {
    /// Duration-only heuristic. A `true` here does not make a video a Short;
    /// only the redirect probe can confirm that.
    pub fn is_short(&self) -> bool {
        self.duration_secs <= SHORTS_MAX_DURATION_SECS
    }

    /// Likes per hundred views.
    pub fn engagement_rate(&self) -> f64 {
        if self.view_count == 0 {
            return 0.0;
        }
        self.like_count as f64 / self.view_count as f64 * 100.0
    }

    pub fn shorts_url(&self) -> String {
        format!("https://www.youtube.com/shorts/{}", self.id)
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}
