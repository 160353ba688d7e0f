//! Search → verify → filter.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    domain::{FetchError, Video},
    infrastructure::cancel::CancelToken,
    shorts::ShortsClassifier,
    youtube::{validate_search, VideoSearch},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AcquireStage {
    Validating,
    Searching,
    ExtractingIds,
    Classifying,
    Filtering,
    Done,
}

impl fmt::Display for AcquireStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AcquireStage::Validating => "validating",
            AcquireStage::Searching => "searching",
            AcquireStage::ExtractingIds => "extracting-ids",
            AcquireStage::Classifying => "classifying",
            AcquireStage::Filtering => "filtering",
            AcquireStage::Done => "done",
        };
        f.write_str(label)
    }
}

pub struct ShortsFetcher {
    search: Arc<dyn VideoSearch>,
    shorts: Arc<dyn ShortsClassifier>,
}

impl ShortsFetcher {
    pub fn new(search: Arc<dyn VideoSearch>, shorts: Arc<dyn ShortsClassifier>) -> Self {
        Self { search, shorts }
    }

    /// Returns the search hits confirmed as Shorts, in search order.
    ///
    /// Any classifier failure fails the whole call, even when some probes
    /// succeeded.
    pub async fn fetch_shorts(
        &self,
        query: &str,
        max_results: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<Video>, FetchError> {
        let mut stage = AcquireStage::Validating;
        let res = self.run(query, max_results, cancel, &mut stage).await;
        match &res {
            Ok(videos) => tracing::debug!(
                target: "pipeline",
                stage = %stage,
                verified = videos.len(),
                quota_used = self.search.quota_used(),
                "acquisition finished"
            ),
            Err(err) => tracing::debug!(
                target: "pipeline",
                failed_in = %stage,
                transport = err.is_transport(),
                cancelled = err.is_cancelled(),
                error = %err,
                "acquisition failed"
            ),
        }
        res
    }

    async fn run(
        &self,
        query: &str,
        max_results: u32,
        cancel: &CancelToken,
        stage: &mut AcquireStage,
    ) -> Result<Vec<Video>, FetchError> {
        validate_search(query, max_results)?;

        advance(stage, AcquireStage::Searching);
        let videos = self.search.search(query, max_results, cancel).await?;
        if videos.is_empty() {
            advance(stage, AcquireStage::Done);
            return Ok(Vec::new());
        }

        advance(stage, AcquireStage::ExtractingIds);
        let ids: Vec<String> = videos.iter().map(|video| video.id.clone()).collect();
        let lookup: HashMap<String, Video> = videos
            .into_iter()
            .map(|video| (video.id.clone(), video))
            .collect();

        advance(stage, AcquireStage::Classifying);
        let report = self.shorts.classify_batch(&ids, cancel).await;
        if !report.is_complete() {
            tracing::debug!(
                target: "pipeline",
                discarded = report.results.len(),
                "classification incomplete; dropping partial verdicts"
            );
        }
        let verdicts = report.into_result()?;

        advance(stage, AcquireStage::Filtering);
        // An id the catalog returned twice is emitted twice.
        let verified: Vec<Video> = ids
            .iter()
            .filter(|id| verdicts.get(id.as_str()).copied().unwrap_or(false))
            .filter_map(|id| lookup.get(id).cloned())
            .collect();

        tracing::info!(
            target: "pipeline",
            query,
            candidates = ids.len(),
            verified = verified.len(),
            "shorts verified"
        );
        advance(stage, AcquireStage::Done);
        Ok(verified)
    }

    pub fn quota_used(&self) -> u64 {
        self.search.quota_used()
    }
}

fn advance(stage: &mut AcquireStage, next: AcquireStage) {
    tracing::debug!(target: "pipeline", from = %stage, to = %next, "stage transition");
    *stage = next;
}
