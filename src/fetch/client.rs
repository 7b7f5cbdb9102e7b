//! reqwest-backed news source.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::policy::CacheDirective;
use crate::news::{NewsFuture, NewsItem, NewsSource, RetrievalError};

const USER_AGENT: &str = concat!("crypto-news/", env!("CARGO_PKG_VERSION"));

struct Cached {
    fetched_at: Instant,
    items: Vec<NewsItem>,
}

/// Fetches news from an upstream JSON endpoint.
///
/// Every request carries the configured [`CacheDirective`] as
/// `Cache-Control`, and the directive is applied locally as well: under
/// [`CacheDirective::Revalidate`] a successful result is reused until it is
/// older than the interval, under [`CacheDirective::NoStore`] nothing is kept.
/// Failures are never cached. Under `Revalidate`, concurrent callers that
/// miss the cache wait on a single upstream request instead of each issuing
/// their own.
///
/// The upstream body may be a JSON array of items, or an object whose `Data`
/// or `data` field holds that array.
pub struct HttpNewsSource {
    client: Client,
    url: String,
    directive: CacheDirective,
    cached: Mutex<Option<Cached>>,
}

impl HttpNewsSource {
    /// # Errors
    ///
    /// Returns [`RetrievalError::Transport`] if the HTTP client cannot be built
    /// (for example when the TLS backend fails to initialize).
    pub fn new(
        url: impl Into<String>,
        directive: CacheDirective,
        timeout: Duration,
    ) -> Result<Self, RetrievalError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(client, url, directive))
    }

    /// Uses an existing client, sharing its connection pool.
    pub fn with_client(client: Client, url: impl Into<String>, directive: CacheDirective) -> Self {
        Self {
            client,
            url: url.into(),
            directive,
            cached: Mutex::new(None),
        }
    }

    /// The directive sent upstream and applied to the local cache.
    pub fn directive(&self) -> CacheDirective {
        self.directive
    }

    async fn fetch_upstream(&self) -> Result<Vec<NewsItem>, RetrievalError> {
        debug!(url = %self.url, directive = ?self.directive, "fetching crypto news upstream");

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .header("Cache-Control", self.directive.header_value())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, status = status.as_u16(), "upstream returned an error status");
            return Err(RetrievalError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        extract_items(value)
    }
}

impl NewsSource for HttpNewsSource {
    fn fetch_news_items(&self) -> NewsFuture<'_> {
        Box::pin(async move {
            let Some(max_age) = self.directive.freshness() else {
                return self.fetch_upstream().await;
            };

            // Held across the refill so concurrent misses share one upstream call.
            let mut cached = self.cached.lock().await;
            if let Some(c) = cached.as_ref().filter(|c| c.fetched_at.elapsed() < max_age) {
                debug!(count = c.items.len(), "serving crypto news from cache");
                return Ok(c.items.clone());
            }

            let items = self.fetch_upstream().await?;
            *cached = Some(Cached {
                fetched_at: Instant::now(),
                items: items.clone(),
            });

            Ok(items)
        })
    }
}

fn extract_items(value: Value) -> Result<Vec<NewsItem>, RetrievalError> {
    let list = match value {
        Value::Array(list) => list,
        Value::Object(mut map) => match map.remove("Data").or_else(|| map.remove("data")) {
            Some(Value::Array(list)) => list,
            _ => return Err(RetrievalError::Shape),
        },
        _ => return Err(RetrievalError::Shape),
    };
    Ok(list.into_iter().map(NewsItem::new).collect())
}
