//! The fixed JSON envelope returned by `/api/crypto-news`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::NewsItem;

/// Client-facing message for every retrieval failure.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch crypto news";

/// Response body for the news route, tagged by `status`.
///
/// ```json
/// {"status":"success","data":[...],"timestamp":"2024-01-01T00:00:00.000Z"}
/// {"status":"error","message":"Failed to fetch crypto news","data":[]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResponseEnvelope {
    Success {
        data: Vec<NewsItem>,
        #[serde(serialize_with = "iso_millis")]
        timestamp: DateTime<Utc>,
    },
    Error {
        message: String,
        data: Vec<NewsItem>,
    },
}

impl ResponseEnvelope {
    pub fn success(data: Vec<NewsItem>, timestamp: DateTime<Utc>) -> Self {
        Self::Success { data, timestamp }
    }

    /// The error envelope: generic message, empty data.
    pub fn failure() -> Self {
        Self::Error {
            message: FETCH_FAILED_MESSAGE.to_owned(),
            data: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> &[NewsItem] {
        match self {
            Self::Success { data, .. } | Self::Error { data, .. } => data,
        }
    }
}

// `2024-01-01T00:00:00.000Z`: UTC, millisecond precision, `Z` suffix.
fn iso_millis<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn success_wire_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let env = ResponseEnvelope::success(
            vec![NewsItem::new(json!({"id": "btc", "price": 50000}))],
            ts,
        );
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "status": "success",
                "data": [{"id": "btc", "price": 50000}],
                "timestamp": "2024-01-01T00:00:00.000Z"
            })
        );
    }

    #[test]
    fn success_status_is_written_first() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let text = serde_json::to_string(&ResponseEnvelope::success(vec![], ts)).unwrap();
        assert_eq!(
            text,
            r#"{"status":"success","data":[],"timestamp":"2024-01-01T00:00:00.000Z"}"#
        );
    }

    #[test]
    fn failure_wire_shape_is_exact() {
        let text = serde_json::to_string(&ResponseEnvelope::failure()).unwrap();
        assert_eq!(
            text,
            r#"{"status":"error","message":"Failed to fetch crypto news","data":[]}"#
        );
    }

    #[test]
    fn timestamp_keeps_milliseconds() {
        let ts = Utc.timestamp_millis_opt(1_704_067_200_123).unwrap();
        let value = serde_json::to_value(ResponseEnvelope::success(vec![], ts)).unwrap();
        assert_eq!(value["timestamp"], "2024-01-01T00:00:00.123Z");
    }

    #[test]
    fn parses_back_from_the_wire() {
        let env: ResponseEnvelope = serde_json::from_str(
            r#"{"status":"success","data":[1,"two"],"timestamp":"2024-01-01T00:00:00.000Z"}"#,
        )
        .unwrap();
        assert!(env.is_success());
        assert_eq!(env.data().len(), 2);

        let env: ResponseEnvelope = serde_json::from_str(
            r#"{"status":"error","message":"Failed to fetch crypto news","data":[]}"#,
        )
        .unwrap();
        assert_eq!(env, ResponseEnvelope::failure());
    }
}
