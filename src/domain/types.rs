use std::{collections::HashMap, fmt};

use super::error::FetchError;

/// Video id -> "is a Short". Only successfully probed ids have an entry.
pub type ClassificationMap = HashMap<String, bool>;

/// Outcome of a batch classification: whatever was decided, plus the
/// aggregated failure when at least one probe did not complete.
#[derive(Debug, Default)]
pub struct ClassificationReport {
    pub results: ClassificationMap,
    pub failure: Option<FetchError>,
}

impl ClassificationReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Any failure takes precedence over the partial results.
    pub fn into_result(self) -> Result<ClassificationMap, FetchError> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.results),
        }
    }
}

/// Duration bucket understood by the catalog's search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationFilter {
    Any,
    /// Under four minutes. Includes regular short videos, not just Shorts.
    #[default]
    Short,
    Medium,
    Long,
}

impl DurationFilter {
    /// Value for the `videoDuration` parameter; `None` means the parameter is omitted.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            DurationFilter::Any => None,
            DurationFilter::Short => Some("short"),
            DurationFilter::Medium => Some("medium"),
            DurationFilter::Long => Some("long"),
        }
    }
}

impl fmt::Display for DurationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param().unwrap_or("any"))
    }
}
