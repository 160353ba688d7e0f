pub mod env;
mod loader;

pub use env::{AppConfig, ConfigError, DirectoryConfig, LoggingConfig, ShortsConfig, YouTubeConfig};
pub use loader::{load_config, DEFAULT_API_BASE, DEFAULT_SHORTS_BASE_URL};
