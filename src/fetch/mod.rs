//! Outbound news fetching.
//!
//! [`select_cache_directive`] decides how upstream responses may be cached,
//! and [`HttpNewsSource`] is the reqwest-backed [`NewsSource`](crate::news::NewsSource)
//! that applies that decision.

pub mod client;
pub mod policy;

pub use client::HttpNewsSource;
pub use policy::{CacheDirective, DEFAULT_REVALIDATE_SECS, select_cache_directive};
