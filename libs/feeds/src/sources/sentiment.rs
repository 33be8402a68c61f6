//! Fear & greed index from alternative.me, via relay

use super::{lenient_f64, SourceClient};
use crate::cache::SharedSnapshotCache;
use crate::cascade::{Cascade, Fetched, Fetcher, Stage};
use crate::endpoints::FEAR_GREED_URL;
use crate::error::{FeedError, Result};
use async_trait::async_trait;
use pulse_types::{DataKind, Sentiment};
use serde_json::Value;
use std::sync::Arc;

fn parse_sentiment(body: &Value) -> Result<Sentiment> {
    let latest = body
        .get("data")
        .and_then(Value::as_array)
        .and_then(|data| data.first())
        .ok_or_else(|| FeedError::shape("missing data[0]"))?;

    // value comes as a string ("54")
    let value = latest
        .get("value")
        .and_then(lenient_f64)
        .filter(|v| (0.0..=100.0).contains(v))
        .ok_or_else(|| FeedError::shape("index value outside 0..=100"))?;

    let classification = latest
        .get("value_classification")
        .and_then(Value::as_str)
        .ok_or_else(|| FeedError::shape("missing value_classification"))?;

    Ok(Sentiment {
        value: value.round() as u8,
        classification: classification.to_string(),
    })
}

pub struct SentimentClient {
    cascade: Cascade<Sentiment>,
    fetcher: Arc<Fetcher>,
    cache: SharedSnapshotCache,
}

impl SentimentClient {
    pub fn new(fetcher: Arc<Fetcher>, cache: SharedSnapshotCache) -> Self {
        let cascade = Cascade::new(DataKind::Sentiment)
            .then(Stage::via_relay("alternative.me", FEAR_GREED_URL, parse_sentiment));

        Self { cascade, fetcher, cache }
    }
}

#[async_trait]
impl SourceClient for SentimentClient {
    type Output = Sentiment;

    fn kind(&self) -> DataKind {
        DataKind::Sentiment
    }

    async fn fetch(&self) -> Fetched<Sentiment> {
        match self.cascade.resolve(&self.fetcher).await {
            Some(resolved) => {
                self.cache.store_sentiment(resolved.value.clone());
                Fetched::fresh(resolved.value, resolved.stage)
            }
            None => Fetched::cached(self.cache.sentiment()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::Origin;
    use crate::relay::RelayEndpoint;
    use crate::sources::test_support::setup;
    use crate::testing::Reply;
    use serde_json::json;

    #[test]
    fn test_parse_string_value() {
        let sentiment = parse_sentiment(&json!({
            "name": "Fear and Greed Index",
            "data": [{ "value": "72", "value_classification": "Greed", "timestamp": "1760572800" }]
        }))
        .unwrap();

        assert_eq!(sentiment.value, 72);
        assert_eq!(sentiment.classification, "Greed");
    }

    #[test]
    fn test_out_of_range_or_empty_is_invalid() {
        assert!(parse_sentiment(&json!({ "data": [] })).unwrap_err().is_shape());
        assert!(parse_sentiment(&json!({ "data": [{ "value": "140", "value_classification": "?" }] }))
            .unwrap_err()
            .is_shape());
    }

    #[tokio::test]
    async fn test_allorigins_envelope_is_transparent() {
        let (transport, fetcher, cache) = setup();
        transport.set(RelayEndpoint::corsproxy().wrap(FEAR_GREED_URL), Reply::Status(403));
        transport.set(
            RelayEndpoint::allorigins().wrap(FEAR_GREED_URL),
            Reply::Json(json!({
                "contents": "{\"data\":[{\"value\":\"20\",\"value_classification\":\"Extreme Fear\"}]}"
            })),
        );

        let fetched = SentimentClient::new(fetcher, cache.clone()).fetch().await;

        assert_eq!(fetched.origin, Origin::Fresh { stage: "alternative.me".to_string() });
        assert_eq!(fetched.value.value, 20);
        assert_eq!(cache.sentiment().classification, "Extreme Fear");
    }
}
