//! Cache directive selection for outbound news fetches.

use std::time::Duration;

use crate::config::Environment;

/// Revalidation interval used outside production when none is configured.
pub const DEFAULT_REVALIDATE_SECS: u64 = 10;

/// How an outbound fetch may be cached.
///
/// The two shapes are exclusive: either nothing is stored, or a stored
/// response stays fresh for a fixed number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDirective {
    /// `no-store` with a revalidation interval of zero.
    NoStore,
    /// Reuse a response for `seconds` before fetching again.
    Revalidate { seconds: u64 },
}

impl CacheDirective {
    /// Revalidation interval in seconds; `0` for [`NoStore`](Self::NoStore).
    pub fn revalidate_seconds(&self) -> u64 {
        match self {
            Self::NoStore => 0,
            Self::Revalidate { seconds } => *seconds,
        }
    }

    /// How long a fetched response may be reused, if at all.
    pub fn freshness(&self) -> Option<Duration> {
        match self {
            Self::NoStore | Self::Revalidate { seconds: 0 } => None,
            Self::Revalidate { seconds } => Some(Duration::from_secs(*seconds)),
        }
    }

    /// The `Cache-Control` request header value carrying this directive.
    pub fn header_value(&self) -> String {
        match self {
            Self::NoStore => "no-store".to_owned(),
            Self::Revalidate { seconds } => format!("max-age={seconds}"),
        }
    }
}

/// Picks the cache directive for an outbound fetch.
///
/// Production always gets [`CacheDirective::NoStore`] and ignores
/// `revalidate_secs`. Every other environment gets
/// [`CacheDirective::Revalidate`] with `revalidate_secs`, or
/// [`DEFAULT_REVALIDATE_SECS`] when it is `None`.
///
/// # Examples
///
/// ```
/// use crypto_news::config::Environment;
/// use crypto_news::fetch::{select_cache_directive, CacheDirective};
///
/// assert_eq!(
///     select_cache_directive(&Environment::Production, Some(300)),
///     CacheDirective::NoStore,
/// );
/// assert_eq!(
///     select_cache_directive(&Environment::default(), None),
///     CacheDirective::Revalidate { seconds: 10 },
/// );
/// ```
pub fn select_cache_directive(env: &Environment, revalidate_secs: Option<u64>) -> CacheDirective {
    if env.is_production() {
        CacheDirective::NoStore
    } else {
        CacheDirective::Revalidate {
            seconds: revalidate_secs.unwrap_or(DEFAULT_REVALIDATE_SECS),
        }
    }
}
