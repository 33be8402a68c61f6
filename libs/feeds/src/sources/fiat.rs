//! Fiat exchange rates: exchangerate-api direct, then the same call via relay

use super::{positive_finite, SourceClient};
use crate::cache::SharedSnapshotCache;
use crate::cascade::{Cascade, Fetched, Fetcher, Stage};
use crate::endpoints::EXCHANGE_RATE_URL;
use crate::error::{FeedError, Result};
use async_trait::async_trait;
use pulse_types::{DataKind, FiatRates};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

fn parse_rates(body: &Value) -> Result<FiatRates> {
    let rates: BTreeMap<String, f64> = body
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| FeedError::shape("missing rates"))?
        .iter()
        .filter_map(|(code, rate)| Some((code.clone(), positive_finite(rate.as_f64()?)?)))
        .collect();

    if rates.is_empty() {
        return Err(FeedError::shape("rates table is empty"));
    }

    let base = body
        .get("base")
        .and_then(Value::as_str)
        .unwrap_or("USD")
        .to_string();

    Ok(FiatRates { base, rates })
}

pub struct FiatClient {
    cascade: Cascade<FiatRates>,
    fetcher: Arc<Fetcher>,
    cache: SharedSnapshotCache,
}

impl FiatClient {
    pub fn new(fetcher: Arc<Fetcher>, cache: SharedSnapshotCache) -> Self {
        let cascade = Cascade::new(DataKind::Fiat)
            .then(Stage::direct_get("exchangerate-api", EXCHANGE_RATE_URL, parse_rates))
            .then(Stage::via_relay("exchangerate-api via relay", EXCHANGE_RATE_URL, parse_rates));

        Self { cascade, fetcher, cache }
    }
}

#[async_trait]
impl SourceClient for FiatClient {
    type Output = Option<FiatRates>;

    fn kind(&self) -> DataKind {
        DataKind::Fiat
    }

    async fn fetch(&self) -> Fetched<Option<FiatRates>> {
        match self.cascade.resolve(&self.fetcher).await {
            Some(resolved) => {
                self.cache.store_fiat(resolved.value.clone());
                Fetched::fresh(Some(resolved.value), resolved.stage)
            }
            None => Fetched::cached(self.cache.fiat()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::{Origin, Request, Route};
    use crate::relay::RelayEndpoint;
    use crate::sources::test_support::setup;
    use crate::testing::Reply;
    use serde_json::json;

    fn body() -> Value {
        json!({ "base": "USD", "date": "2026-10-16", "rates": { "USD": 1, "EUR": 0.92, "UAH": 41.3 } })
    }

    #[test]
    fn test_parse_rates() {
        let rates = parse_rates(&body()).unwrap();
        assert_eq!(rates.base, "USD");
        assert_eq!(rates.rate("EUR"), Some(0.92));
        assert_eq!(rates.rates.len(), 3);
    }

    #[test]
    fn test_missing_rates_is_shape_error() {
        assert!(parse_rates(&json!({ "result": "error" })).unwrap_err().is_shape());
        assert!(parse_rates(&json!({ "rates": {} })).unwrap_err().is_shape());
    }

    #[test]
    fn test_stage_order() {
        let (_transport, fetcher, cache) = setup();
        let client = FiatClient::new(fetcher, cache);

        assert_eq!(client.cascade.kind(), DataKind::Fiat);
        let stages = client.cascade.stages();
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].route(), &Route::Direct(Request::Get(EXCHANGE_RATE_URL.to_string())));
        assert_eq!(stages[1].route(), &Route::ViaRelay(EXCHANGE_RATE_URL.to_string()));
        assert_eq!(stages[1].label(), "exchangerate-api via relay");
    }

    #[tokio::test]
    async fn test_direct_call_first() {
        let (transport, fetcher, cache) = setup();
        transport.set(EXCHANGE_RATE_URL, Reply::Json(body()));

        let fetched = FiatClient::new(fetcher, cache.clone()).fetch().await;

        assert_eq!(fetched.origin, Origin::Fresh { stage: "exchangerate-api".to_string() });
        assert_eq!(transport.calls(), vec![EXCHANGE_RATE_URL.to_string()]);
        assert_eq!(cache.fiat(), fetched.value);
    }

    #[tokio::test]
    async fn test_relay_after_direct_failure() {
        let (transport, fetcher, cache) = setup();
        transport.set(EXCHANGE_RATE_URL, Reply::Status(503));
        transport.set(RelayEndpoint::corsproxy().wrap(EXCHANGE_RATE_URL), Reply::Json(body()));

        let fetched = FiatClient::new(fetcher, cache).fetch().await;

        assert_eq!(
            fetched.origin,
            Origin::Fresh { stage: "exchangerate-api via relay".to_string() }
        );
        assert!(fetched.value.is_some());
    }
}
