use std::sync::Arc;

use anyhow::{Context, Result};
use url::Url;

use crate::{
    config::AppConfig,
    domain::{DurationFilter, Video},
    infrastructure::{cancel::CancelToken, http},
    pipeline::ShortsFetcher,
    shorts::{HttpProbe, ShortsChecker},
    youtube::{HttpCatalog, SearchClient},
};

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    /// Skip Shorts verification and search every duration bucket.
    pub include_all_videos: bool,
}

pub struct KingmakerApp {
    search: Arc<SearchClient>,
    fetcher: ShortsFetcher,
}

impl KingmakerApp {
    pub fn initialize(config: &AppConfig) -> Result<Self> {
        let api_http = http::api_client(config.http_timeout).context("failed to build API client")?;
        let probe_http =
            http::probe_client(config.http_timeout).context("failed to build probe client")?;

        let catalog = HttpCatalog::new(
            api_http,
            config.youtube.api_base.clone(),
            config.youtube.api_key.clone(),
        )
        .context("failed to create YouTube client")?;
        let search = Arc::new(SearchClient::new(Arc::new(catalog)));

        let base_url = Url::parse(&config.shorts.base_url)
            .with_context(|| format!("invalid shorts base URL {}", config.shorts.base_url))?;
        let checker = ShortsChecker::new(Arc::new(HttpProbe::new(probe_http)), base_url)
            .with_max_in_flight(config.shorts.max_in_flight);

        let fetcher = ShortsFetcher::new(search.clone(), Arc::new(checker));

        tracing::debug!(
            target: "app",
            api_base = %config.youtube.api_base,
            shorts_base = %config.shorts.base_url,
            max_in_flight = config.shorts.max_in_flight,
            timeout = ?config.http_timeout,
            "clients initialized"
        );

        Ok(Self { search, fetcher })
    }

    pub async fn run(&self, request: &SearchRequest, cancel: &CancelToken) -> Result<Vec<Video>> {
        tracing::info!(
            target: "app",
            query = %request.query,
            max_results = request.max_results,
            include_all_videos = request.include_all_videos,
            "search started"
        );

        let videos = if request.include_all_videos {
            self.search
                .search_with_duration(
                    &request.query,
                    request.max_results,
                    DurationFilter::Any,
                    cancel,
                )
                .await
                .context("failed to fetch videos")?
        } else {
            self.fetcher
                .fetch_shorts(&request.query, request.max_results, cancel)
                .await
                .context("failed to fetch Shorts")?
        };

        tracing::info!(
            target: "app",
            found = videos.len(),
            quota_used = self.quota_used(),
            "search finished"
        );
        Ok(videos)
    }

    pub fn quota_used(&self) -> u64 {
        self.search.quota_used()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::config::{DirectoryConfig, LoggingConfig, ShortsConfig, YouTubeConfig};

    fn config(server: &MockServer) -> AppConfig {
        AppConfig {
            youtube: YouTubeConfig {
                api_key: "test-key".into(),
                api_base: format!("{}/youtube/v3", server.uri()),
            },
            shorts: ShortsConfig {
                base_url: format!("{}/shorts/", server.uri()),
                max_in_flight: 4,
            },
            http_timeout: Duration::from_secs(5),
            default_max_results: 25,
            directories: DirectoryConfig {
                logs_dir: "logs".into(),
            },
            logging: LoggingConfig {
                level: "info".into(),
            },
        }
    }

    async fn mount_catalog(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/youtube/v3/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "id": { "videoId": "short1" } },
                    { "id": { "videoId": "long1" } },
                    { "id": { "videoId": "short2" } }
                ]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/videos"))
            .and(query_param("id", "short1,long1,short2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "id": "short1", "snippet": { "title": "First" }, "contentDetails": { "duration": "PT20S" } },
                    { "id": "long1", "snippet": { "title": "Long" }, "contentDetails": { "duration": "PT3M" } },
                    { "id": "short2", "snippet": { "title": "Second" }, "contentDetails": { "duration": "PT58S" } }
                ]
            })))
            .mount(server)
            .await;
    }

    async fn mount_probes(server: &MockServer) {
        for id in ["short1", "short2"] {
            Mock::given(method("HEAD"))
                .and(path(format!("/shorts/{id}")))
                .respond_with(ResponseTemplate::new(200))
                .mount(server)
                .await;
        }
        Mock::given(method("HEAD"))
            .and(path("/shorts/long1"))
            .respond_with(ResponseTemplate::new(303).insert_header("location", "/watch?v=long1"))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn end_to_end_returns_verified_shorts_and_meters_quota() {
        let server = MockServer::start().await;
        mount_catalog(&server).await;
        mount_probes(&server).await;

        let app = KingmakerApp::initialize(&config(&server)).unwrap();
        let request = SearchRequest {
            query: "rust".into(),
            max_results: 10,
            include_all_videos: false,
        };

        let videos = app.run(&request, &CancelToken::never()).await.unwrap();

        let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["short1", "short2"]);
        assert_eq!(videos[1].duration_secs, 58);
        assert_eq!(app.quota_used(), 101);
    }

    #[tokio::test]
    async fn include_all_videos_skips_verification() {
        let server = MockServer::start().await;
        mount_catalog(&server).await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = KingmakerApp::initialize(&config(&server)).unwrap();
        let request = SearchRequest {
            query: "rust".into(),
            max_results: 10,
            include_all_videos: true,
        };

        let videos = app.run(&request, &CancelToken::never()).await.unwrap();

        assert_eq!(videos.len(), 3);
        assert_eq!(app.quota_used(), 101);
    }

    #[tokio::test]
    async fn removed_or_erroring_videos_are_dropped_not_fatal() {
        let server = MockServer::start().await;
        mount_catalog(&server).await;
        Mock::given(method("HEAD"))
            .and(path("/shorts/short1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/shorts/long1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/shorts/short2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let app = KingmakerApp::initialize(&config(&server)).unwrap();
        let request = SearchRequest {
            query: "rust".into(),
            max_results: 10,
            include_all_videos: false,
        };

        let videos = app.run(&request, &CancelToken::never()).await.unwrap();

        let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["short1"]);
    }

    #[tokio::test]
    async fn unreachable_shorts_host_fails_the_run_with_context() {
        let server = MockServer::start().await;
        mount_catalog(&server).await;

        let mut config = config(&server);
        config.shorts.base_url = "http://127.0.0.1:9/shorts/".into();
        let app = KingmakerApp::initialize(&config).unwrap();
        let request = SearchRequest {
            query: "rust".into(),
            max_results: 10,
            include_all_videos: false,
        };

        let err = app.run(&request, &CancelToken::never()).await.unwrap_err();

        assert!(format!("{err:#}").starts_with("failed to fetch Shorts: failed to check 3 of 3"));
        assert_eq!(app.quota_used(), 101);
    }
}
