//! Shorts verification by probing `/shorts/{id}` without following redirects.

mod checker;
mod probe;

pub use checker::{ShortsChecker, ShortsClassifier, DEFAULT_MAX_IN_FLIGHT};
pub use probe::{HttpProbe, ProbeTransport};
