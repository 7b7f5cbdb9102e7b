//! Crypto news: the retrieval capability and the `/api/crypto-news` handler.
//!
//! A [`NewsSource`] produces a list of [`NewsItem`]s or a [`RetrievalError`].
//! [`handle_get_news`] turns that outcome into a status code and a
//! [`ResponseEnvelope`]; the route layer serializes it.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod envelope;
pub mod handler;

pub use envelope::{FETCH_FAILED_MESSAGE, ResponseEnvelope};
pub use handler::{handle_get_news, handle_get_news_at, news_response};

/// One news entry, passed through exactly as the source produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewsItem(serde_json::Value);

impl NewsItem {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for NewsItem {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Any failure to obtain news items. The HTTP boundary treats every variant
/// the same way and never shows its text to clients.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream answered with status {status}")]
    Status { status: u16 },

    #[error("upstream body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("upstream JSON has no list of news items")]
    Shape,
}

/// Boxed future returned by [`NewsSource::fetch_news_items`].
pub type NewsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<NewsItem>, RetrievalError>> + Send + 'a>>;

/// A capability that retrieves the current list of news items.
///
/// Implementations own their transport, caching, and timeouts; callers make a
/// single attempt and take the result as final.
pub trait NewsSource: Send + Sync {
    fn fetch_news_items(&self) -> NewsFuture<'_>;
}
