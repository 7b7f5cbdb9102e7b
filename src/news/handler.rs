//! `GET /api/crypto-news`.

use chrono::{DateTime, Utc};
use tracing::{debug, error};

use super::{NewsSource, ResponseEnvelope};
use crate::{Response, StatusCode};

/// Retrieves news once and maps the outcome onto a status and envelope.
///
/// Success is `200` with the items and the current time. Any
/// [`RetrievalError`](super::RetrievalError) is logged and becomes `500`
/// with [`ResponseEnvelope::failure`]; the error text never reaches the body.
pub async fn handle_get_news(source: &dyn NewsSource) -> (StatusCode, ResponseEnvelope) {
    handle_get_news_at(source, Utc::now).await
}

/// [`handle_get_news`] with the success timestamp taken from `clock`, which
/// is called after retrieval completes.
pub async fn handle_get_news_at<C>(
    source: &dyn NewsSource,
    clock: C,
) -> (StatusCode, ResponseEnvelope)
where
    C: FnOnce() -> DateTime<Utc>,
{
    match source.fetch_news_items().await {
        Ok(items) => {
            debug!(count = items.len(), "crypto news retrieved");
            (StatusCode::Ok, ResponseEnvelope::success(items, clock()))
        }
        Err(e) => {
            error!(error = %e, "failed to fetch crypto news");
            (StatusCode::InternalServerError, ResponseEnvelope::failure())
        }
    }
}

/// [`handle_get_news`] serialized into an HTTP response.
pub async fn news_response(source: &dyn NewsSource) -> Response {
    let (status, envelope) = handle_get_news(source).await;
    match Response::json(status, &envelope) {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "failed to serialize news envelope");
            Response::new(StatusCode::InternalServerError).body("Internal Server Error")
        }
    }
}
