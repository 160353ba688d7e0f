use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use url::Url;

use crate::{
    domain::{ClassificationMap, ClassificationReport, FetchError, Stage},
    infrastructure::cancel::CancelToken,
};

use super::probe::ProbeTransport;

/// No cap: every id in a batch gets its own concurrent probe.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 0;

/// Decides whether videos are Shorts.
#[async_trait]
pub trait ShortsClassifier: Send + Sync {
    async fn classify(&self, id: &str, cancel: &CancelToken) -> Result<bool, FetchError>;

    /// Probes every id and waits for all of them. Failed probes have no
    /// entry in the map and are summarized in `failure`.
    async fn classify_batch(&self, ids: &[String], cancel: &CancelToken) -> ClassificationReport;
}

/// Redirect-based detection: `/shorts/{id}` answers 200 for a Short and
/// redirects to `/watch?v={id}` for anything else.
pub struct ShortsChecker {
    transport: Arc<dyn ProbeTransport>,
    base_url: Url,
    max_in_flight: usize,
}

impl ShortsChecker {
    pub fn new(transport: Arc<dyn ProbeTransport>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Caps concurrent probes per batch. `0` keeps the default of probing
    /// every id at once.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    pub fn shorts_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }
}

/// Only a 2xx answer marks a Short. Redirects and every other status,
/// including 404 for a removed video, read as "not a Short".
fn is_short_status(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait]
impl ShortsClassifier for ShortsChecker {
    async fn classify(&self, id: &str, cancel: &CancelToken) -> Result<bool, FetchError> {
        if id.is_empty() {
            return Err(FetchError::InvalidArgument("video ID cannot be empty"));
        }

        let url = self.shorts_url(id);
        let status = cancel
            .run(Stage::Probe, self.transport.head_status(url.as_str()))
            .await?;
        tracing::trace!(target: "shorts", video_id = id, status, "probe answered");
        Ok(is_short_status(status))
    }

    async fn classify_batch(&self, ids: &[String], cancel: &CancelToken) -> ClassificationReport {
        if ids.is_empty() {
            return ClassificationReport::default();
        }

        let limit = match self.max_in_flight {
            0 => ids.len(),
            n => n.min(ids.len()),
        };

        let mut outcomes = stream::iter(ids.iter().cloned().enumerate())
            .map(|(idx, id)| async move {
                let outcome = self.classify(&id, cancel).await;
                (idx, id, outcome)
            })
            .buffer_unordered(limit);

        let mut results = ClassificationMap::with_capacity(ids.len());
        let mut failed = 0usize;
        let mut first: Option<(usize, String, FetchError)> = None;

        while let Some((idx, id, outcome)) = outcomes.next().await {
            match outcome {
                Ok(is_short) => {
                    results.insert(id, is_short);
                }
                Err(err) => {
                    failed += 1;
                    tracing::debug!(target: "shorts", video_id = %id, error = %err, "probe failed");
                    let earlier = first.as_ref().map_or(true, |(first_idx, _, _)| idx < *first_idx);
                    if earlier {
                        first = Some((idx, id, err));
                    }
                }
            }
        }

        let failure = first.map(|(_, first_id, first)| {
            tracing::warn!(
                target: "shorts",
                failed,
                total = ids.len(),
                "some shorts probes failed"
            );
            FetchError::PartialClassification {
                failed,
                total: ids.len(),
                first_id,
                first: Box::new(first),
            }
        });

        tracing::debug!(
            target: "shorts",
            total = ids.len(),
            classified = results.len(),
            shorts = results.values().filter(|is_short| **is_short).count(),
            limit,
            "batch classified"
        );

        ClassificationReport { results, failure }
    }
}
