//! # crypto-news
//!
//! A small async HTTP/1.1 backend that serves crypto news as JSON.
//!
//! `GET /api/crypto-news` asks a [`NewsSource`](news::NewsSource) for the
//! current items and answers with a fixed envelope:
//!
//! ```text
//! 200 {"status":"success","data":[...],"timestamp":"2024-01-01T00:00:00.000Z"}
//! 500 {"status":"error","message":"Failed to fetch crypto news","data":[]}
//! ```
//!
//! Outbound fetches are cached according to
//! [`select_cache_directive`](fetch::select_cache_directive): never in
//! production, for a bounded interval everywhere else.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crypto_news::{api, config::Config, server::Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let app = Arc::new(api::app(Arc::new(api::news_source(&config)?)));
//!     let server = Server::bind(config.bind_addr.to_string()).await?;
//!     server.run(move |req| {
//!         let app = Arc::clone(&app);
//!         async move { app.handle(req).await }
//!     }).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod fetch;
pub mod http;
pub mod middleware;
pub mod news;
pub mod router;
pub mod server;
pub mod site;

pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
