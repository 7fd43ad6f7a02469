mod error;

pub use error::FeedError;

use crate::config::AppConfig;
use crate::internal::mapper::{PAGE_SIZE, map_page};
use crate::internal::models::{DisplayArticle, TopHeadlinesResponse};
use crate::internal::thread::Thread;
use anyhow::{Context, Result};
use jiff::Timestamp;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

const LANGUAGE: &str = "en";

/// HTTP client for the provider's `top-headlines` endpoint.
///
/// One call fetches one page. There is no retry, no cache and no explicit
/// timeout; the state machine decides what to do with a failure.
#[derive(Clone)]
pub struct ApiService {
    client: Client,
    base_url: String,
    credential: Option<SecretString>,
    credential_hint: String,
    enable_performance_metrics: bool,
}

impl ApiService {
    /// Build the service from configuration, resolving the credential from
    /// the environment variables it names.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let credential = config.api.resolve_credential();
        if credential.is_none() {
            tracing::warn!(
                "No news API credential found in {}; every fetch will fail",
                config.api.credential_hint()
            );
        }

        let client = Client::builder()
            .user_agent(config.network.user_agent.clone())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.network.base_url),
            credential,
            credential_hint: config.api.credential_hint(),
            enable_performance_metrics: config.logging.enable_performance_metrics,
        })
    }

    /// Service pointed at an arbitrary base URL, used against mock servers.
    pub fn with_base_url(base_url: impl Into<String>, credential: Option<SecretString>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(&base_url.into()),
            credential,
            credential_hint: "GNEWS_API_KEY or NEWS_API_KEY".to_string(),
            enable_performance_metrics: false,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn endpoint(&self) -> String {
        format!("{}top-headlines", self.base_url)
    }

    /// Fetch page `page` (1-based) of `thread` and map it for display.
    #[tracing::instrument(skip(self, thread), fields(thread = %thread))]
    pub async fn fetch_page(
        &self,
        page: u32,
        thread: Thread,
    ) -> Result<Vec<DisplayArticle>, FeedError> {
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| FeedError::Configuration(self.credential_hint.clone()))?;

        let start = std::time::Instant::now();
        let page = page.max(1);
        let mut query: Vec<(&str, String)> = vec![
            ("token", credential.expose_secret().to_string()),
            ("lang", LANGUAGE.to_string()),
            ("max", PAGE_SIZE.to_string()),
            ("page", page.to_string()),
        ];
        if let Some(topic) = thread.topic() {
            query.push(("topic", topic.to_string()));
        }

        let response = self.client.get(self.endpoint()).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), page, "news request failed");
            return Err(FeedError::Status(status.as_u16()));
        }

        let body: TopHeadlinesResponse = response
            .json()
            .await
            .map_err(|e| {
                FeedError::Transport(format!("invalid response body: {}", e.without_url()))
            })?;

        let articles = map_page(&body.articles, page, thread, Timestamp::now());

        if self.enable_performance_metrics {
            tracing::debug!(elapsed = ?start.elapsed(), count = articles.len(), "api.fetch_page");
        }
        tracing::info!(page, count = articles.len(), "Fetched news page");

        Ok(articles)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    match base_url.ends_with('/') {
        true => base_url.to_string(),
        false => format!("{}/", base_url),
    }
}
