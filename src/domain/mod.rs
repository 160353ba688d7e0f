pub mod error;
pub mod types;
pub mod video;

pub use error::{FetchError, Stage, TransportError};
pub use types::{ClassificationMap, ClassificationReport, DurationFilter};
pub use video::Video;
