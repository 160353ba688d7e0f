//! Quota-metered access to the YouTube Data API v3 (`search.list` + `videos.list`).

pub mod catalog;
mod client;
mod duration;

pub use catalog::{HttpCatalog, VideoCatalog, MAX_SEARCH_RESULTS};
pub use client::{
    QuotaCounter, SearchClient, VideoSearch, MAX_VIDEOS_PER_REQUEST, QUOTA_COST_SEARCH,
    QUOTA_COST_VIDEOS,
};
pub(crate) use client::validate_search;
pub use duration::parse_duration;
