//! `HttpNewsSource` against a mock upstream.

use std::time::Duration;

use crypto_news::fetch::{CacheDirective, HttpNewsSource};
use crypto_news::news::{NewsSource, RetrievalError, handle_get_news};
use crypto_news::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(server: &MockServer, directive: CacheDirective) -> HttpNewsSource {
    HttpNewsSource::new(
        format!("{}/news", server.uri()),
        directive,
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn no_store_sends_header_and_always_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .and(header("cache-control", "no-store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "btc"}])))
        .expect(2)
        .mount(&server)
        .await;

    let source = source(&server, CacheDirective::NoStore);
    for _ in 0..2 {
        let items = source.fetch_news_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_value(), &json!({"id": "btc"}));
    }
}

#[tokio::test]
async fn revalidate_reuses_result_within_interval() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .and(header("cache-control", "max-age=60"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Type": 100, "Data": [{"id": 1}, {"id": 2}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let source = source(&server, CacheDirective::Revalidate { seconds: 60 });
    let first = source.fetch_news_items().await.unwrap();
    let second = source.fetch_news_items().await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn revalidate_refetches_after_interval() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .and(header("cache-control", "max-age=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "sol"}])))
        .expect(2)
        .mount(&server)
        .await;

    let source = source(&server, CacheDirective::Revalidate { seconds: 1 });
    assert_eq!(source.fetch_news_items().await.unwrap().len(), 1);
    assert_eq!(source.fetch_news_items().await.unwrap().len(), 1);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(source.fetch_news_items().await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_misses_share_one_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": "ada"}]))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let source = source(&server, CacheDirective::Revalidate { seconds: 60 });
    let (a, b) = tokio::join!(source.fetch_news_items(), source.fetch_news_items());
    assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn revalidate_zero_never_reuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(3)
        .mount(&server)
        .await;

    let source = source(&server, CacheDirective::Revalidate { seconds: 0 });
    for _ in 0..3 {
        assert!(source.fetch_news_items().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn failures_are_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "eth"}])))
        .expect(1)
        .mount(&server)
        .await;

    let source = source(&server, CacheDirective::Revalidate { seconds: 60 });
    assert!(matches!(
        source.fetch_news_items().await,
        Err(RetrievalError::Status { status: 503 })
    ));
    assert_eq!(source.fetch_news_items().await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let source = source(&server, CacheDirective::NoStore);
    assert!(matches!(
        source.fetch_news_items().await,
        Err(RetrievalError::Decode(_))
    ));
}

#[tokio::test]
async fn unexpected_shape_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Message": "rate limited"})))
        .mount(&server)
        .await;

    let source = source(&server, CacheDirective::NoStore);
    assert!(matches!(
        source.fetch_news_items().await,
        Err(RetrievalError::Shape)
    ));
}

#[tokio::test]
async fn slow_upstream_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let source = HttpNewsSource::new(
        format!("{}/news", server.uri()),
        CacheDirective::NoStore,
        Duration::from_millis(200),
    )
    .unwrap();
    assert!(matches!(
        source.fetch_news_items().await,
        Err(RetrievalError::Transport(_))
    ));
}

#[tokio::test]
async fn handler_hides_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(500).set_body_string("secret stack trace"))
        .mount(&server)
        .await;

    let source = source(&server, CacheDirective::NoStore);
    let (status, envelope) = handle_get_news(&source).await;
    assert_eq!(status, StatusCode::InternalServerError);
    let text = serde_json::to_string(&envelope).unwrap();
    assert_eq!(
        text,
        r#"{"status":"error","message":"Failed to fetch crypto news","data":[]}"#
    );
}
