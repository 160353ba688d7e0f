use std::fmt;

use thiserror::Error;

/// Remote call that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Details,
    Probe,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Search => "search",
            Stage::Details => "details",
            Stage::Probe => "probe",
        };
        f.write_str(label)
    }
}

/// Failure of a single remote call, before any stage context is attached.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("{stage} request failed: {error}")]
    Transport { stage: Stage, error: TransportError },
    #[error("{stage} request cancelled")]
    Cancelled { stage: Stage },
    #[error("details batch {batch}/{batches} failed: {error}")]
    UpstreamBatch {
        batch: usize,
        batches: usize,
        error: TransportError,
    },
    #[error("failed to check {failed} of {total} video(s), first failure {first_id}: {first}")]
    PartialClassification {
        failed: usize,
        total: usize,
        first_id: String,
        first: Box<FetchError>,
    },
}

impl FetchError {
    pub fn transport(stage: Stage, error: TransportError) -> Self {
        FetchError::Transport { stage, error }
    }

    /// Network, status, decode or cancellation failure of one call.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::Cancelled { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_names_the_stage() {
        let err = FetchError::transport(Stage::Details, TransportError::Other("boom".into()));
        assert_eq!(err.to_string(), "details request failed: boom");
        assert!(err.is_transport());
    }

    #[test]
    fn partial_classification_reports_count_and_first_failure() {
        let err = FetchError::PartialClassification {
            failed: 1,
            total: 2,
            first_id: "Y".into(),
            first: Box::new(FetchError::Cancelled {
                stage: Stage::Probe,
            }),
        };
        assert_eq!(
            err.to_string(),
            "failed to check 1 of 2 video(s), first failure Y: probe request cancelled"
        );
        assert!(!err.is_transport());
    }
}
