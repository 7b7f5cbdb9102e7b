//! Route table and application assembly.

use std::sync::Arc;

use crate::config::Config;
use crate::fetch::{HttpNewsSource, select_cache_directive};
use crate::middleware::{LoggerMiddleware, Pipeline};
use crate::news::{NewsSource, RetrievalError, news_response};
use crate::site::author_response;
use crate::{Request, Router};

pub const NEWS_PATH: &str = "/api/crypto-news";
pub const AUTHOR_PATH: &str = "/api/author";

/// Registers the API routes against `source`.
pub fn routes(source: Arc<dyn NewsSource>) -> Router {
    let mut router = Router::new();

    router.get(NEWS_PATH, move |_req: Request| {
        let source = Arc::clone(&source);
        async move { news_response(source.as_ref()).await }
    });
    router.get(AUTHOR_PATH, |_req: Request| async { author_response() });

    router
}

/// The full request pipeline: request logging around [`routes`].
pub fn app(source: Arc<dyn NewsSource>) -> Pipeline {
    Pipeline::new(routes(source)).with(LoggerMiddleware).build()
}

/// Builds the upstream news source described by `config`.
///
/// # Errors
///
/// Propagates client construction failures from [`HttpNewsSource::new`].
pub fn news_source(config: &Config) -> Result<HttpNewsSource, RetrievalError> {
    let directive = select_cache_directive(&config.environment, config.revalidate_secs);
    HttpNewsSource::new(&config.upstream_url, directive, config.upstream_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusCode;
    use crate::fetch::CacheDirective;
    use crate::news::{NewsFuture, NewsItem};

    struct Empty;

    impl NewsSource for Empty {
        fn fetch_news_items(&self) -> NewsFuture<'_> {
            Box::pin(async { Ok(Vec::<NewsItem>::new()) })
        }
    }

    fn get(path: &str) -> Request {
        let raw = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        Request::parse(raw.as_bytes()).unwrap().0
    }

    #[tokio::test]
    async fn both_routes_are_registered() {
        let app = app(Arc::new(Empty));
        assert_eq!(app.handle(get(NEWS_PATH)).await.status(), StatusCode::Ok);
        assert_eq!(app.handle(get(AUTHOR_PATH)).await.status(), StatusCode::Ok);
        assert_eq!(app.handle(get("/api/other")).await.status(), StatusCode::NotFound);
    }

    #[test]
    fn news_source_follows_environment() {
        let prod = Config::from_lookup(|k| match k {
            "APP_ENV" => Some("production".into()),
            "NEWS_REVALIDATE_SECS" => Some("120".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(news_source(&prod).unwrap().directive(), CacheDirective::NoStore);

        let dev = Config::from_lookup(|_| None).unwrap();
        assert_eq!(
            news_source(&dev).unwrap().directive(),
            CacheDirective::Revalidate { seconds: 10 }
        );
    }
}
