use std::{env, str::FromStr, time::Duration};

use url::Url;

use crate::shorts::DEFAULT_MAX_IN_FLIGHT;

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, LoggingConfig, ShortsConfig, YouTubeConfig,
};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_SHORTS_BASE_URL: &str = "https://www.youtube.com/shorts/";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = var("YOUTUBE_API_KEY").ok_or(ConfigError::Missing("YOUTUBE_API_KEY"))?;
        let youtube = YouTubeConfig {
            api_key,
            api_base: var("YOUTUBE_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        };

        let base_url = var("SHORTS_BASE_URL").unwrap_or_else(|| DEFAULT_SHORTS_BASE_URL.to_string());
        if Url::parse(&base_url).is_err() {
            return Err(ConfigError::Invalid {
                key: "SHORTS_BASE_URL",
                value: base_url,
            });
        }
        let shorts = ShortsConfig {
            base_url,
            max_in_flight: parse_or(
                "MAX_IN_FLIGHT_PROBES",
                var("MAX_IN_FLIGHT_PROBES"),
                DEFAULT_MAX_IN_FLIGHT,
            )?,
        };

        let timeout_secs: u64 = parse_or("HTTP_TIMEOUT_SECS", var("HTTP_TIMEOUT_SECS"), 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "HTTP_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let default_max_results: u32 =
            parse_or("DEFAULT_MAX_RESULTS", var("DEFAULT_MAX_RESULTS"), 25)?;
        if default_max_results == 0 {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_MAX_RESULTS",
                value: "0".to_string(),
            });
        }

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            youtube,
            shorts,
            http_timeout: Duration::from_secs(timeout_secs),
            default_max_results,
            directories,
            logging,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
