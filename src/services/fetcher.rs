// src/services/fetcher.rs

//! Content fetcher service.
//!
//! Downloads the Markdown document holding the posts payload, extracts and
//! normalizes it, and publishes the result into the shared [`Feed`].

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use reqwest::Client;
use tokio::sync::RwLock;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, Post};
use crate::services::normalizer::Normalizer;
use crate::services::payload::parse_embedded_payload;
use crate::utils::http::{cache_busted, create_async_client};

/// Point-in-time view of the fetched posts.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub posts: Vec<Post>,
    /// When the posts were last replaced by a successful fetch
    pub last_updated: Option<DateTime<Utc>>,
    /// Set while a non-silent fetch is in flight
    pub loading: bool,
}

/// Shared post list, written only by the fetcher.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    inner: Arc<RwLock<FeedSnapshot>>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.inner.read().await.posts.clone()
    }

    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_updated
    }

    async fn replace(&self, posts: Vec<Post>, at: DateTime<Utc>) {
        let mut guard = self.inner.write().await;
        guard.posts = posts;
        guard.last_updated = Some(at);
    }

    async fn set_loading(&self, loading: bool) {
        self.inner.write().await.loading = loading;
    }
}

/// Result of one fetch attempt. Failures never clear the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The feed now holds `count` posts
    Updated { count: usize },
    /// The document carried no JSON span; the feed is unchanged
    NoPayload,
    /// Transport or decoding failed; the feed is unchanged
    Failed { reason: String },
}

/// Service fetching the posts document from the content source.
pub struct ContentFetcher {
    client: Client,
    source_url: Url,
    normalizer: Normalizer,
    feed: Feed,
    last_stamp: AtomicI64,
}

impl ContentFetcher {
    /// Create a fetcher from the application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = create_async_client(&config.feed)?;
        let source_url = Url::parse(&config.feed.source_url)?;
        Ok(Self::with_client(
            client,
            source_url,
            Normalizer::from_config(&config.listing),
        ))
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(client: Client, source_url: Url, normalizer: Normalizer) -> Self {
        Self {
            client,
            source_url,
            normalizer,
            feed: Feed::new(),
            last_stamp: AtomicI64::new(0),
        }
    }

    /// The feed this fetcher publishes into.
    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    /// Fetch once and publish the result.
    ///
    /// A non-silent fetch marks the feed as loading while it runs. Errors
    /// are logged and leave the previous posts in place; the next poll is
    /// the retry.
    pub async fn fetch(&self, silent: bool) -> FetchOutcome {
        if !silent {
            self.feed.set_loading(true).await;
            log::info!("Fetching posts from {}", self.source_url);
        } else {
            log::debug!("Refreshing posts from {}", self.source_url);
        }

        let outcome = match self.fetch_posts().await {
            Ok(Some(posts)) => {
                let count = posts.len();
                self.feed.replace(posts, Utc::now()).await;
                if silent {
                    log::debug!("Feed refreshed with {count} posts");
                } else {
                    log::info!("Loaded {count} posts");
                }
                FetchOutcome::Updated { count }
            }
            Ok(None) => {
                log::debug!("No JSON payload found in {}", self.source_url);
                FetchOutcome::NoPayload
            }
            Err(e) => {
                if e.is_refresh_error() {
                    log::warn!("Failed to fetch posts from {}: {}", self.source_url, e);
                } else {
                    log::error!("Unexpected error refreshing {}: {}", self.source_url, e);
                }
                FetchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        if !silent {
            self.feed.set_loading(false).await;
        }
        outcome
    }

    /// Download, extract and normalize the posts without touching the feed.
    ///
    /// Returns `Ok(None)` when the document holds no JSON span.
    pub async fn fetch_posts(&self) -> Result<Option<Vec<Post>>> {
        let url = cache_busted(&self.source_url, self.next_stamp());
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(parse_embedded_payload(&text)?.map(|raw| self.normalizer.normalize(&raw)))
    }

    /// Strictly increasing cache-busting stamp, in milliseconds.
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_stamp
            .fetch_max(now, Ordering::SeqCst);
        if previous >= now {
            self.last_stamp.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            now
        }
    }
}
