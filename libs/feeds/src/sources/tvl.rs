//! Total value locked from DefiLlama, via relay

use super::{lenient_f64, positive_finite, SourceClient};
use crate::cache::SharedSnapshotCache;
use crate::cascade::{Cascade, Fetched, Fetcher, Stage};
use crate::endpoints::DEFILLAMA_CHARTS_URL;
use crate::error::{FeedError, Result};
use async_trait::async_trait;
use pulse_types::DataKind;
use serde_json::Value;
use std::sync::Arc;

/// Only the most recent point of the series is used
fn parse_latest_tvl(body: &Value) -> Result<f64> {
    let latest = body
        .as_array()
        .and_then(|series| series.last())
        .ok_or_else(|| FeedError::shape("expected a non-empty series"))?;

    latest
        .get("totalLiquidityUSD")
        .or_else(|| latest.get("totalLiquidity"))
        .and_then(lenient_f64)
        .and_then(positive_finite)
        .ok_or_else(|| FeedError::shape("latest point has no liquidity value"))
}

pub struct TvlClient {
    cascade: Cascade<f64>,
    fetcher: Arc<Fetcher>,
    cache: SharedSnapshotCache,
}

impl TvlClient {
    pub fn new(fetcher: Arc<Fetcher>, cache: SharedSnapshotCache) -> Self {
        let cascade = Cascade::new(DataKind::Tvl)
            .then(Stage::via_relay("defillama", DEFILLAMA_CHARTS_URL, parse_latest_tvl));

        Self { cascade, fetcher, cache }
    }
}

#[async_trait]
impl SourceClient for TvlClient {
    type Output = f64;

    fn kind(&self) -> DataKind {
        DataKind::Tvl
    }

    async fn fetch(&self) -> Fetched<f64> {
        match self.cascade.resolve(&self.fetcher).await {
            Some(resolved) => {
                self.cache.store_tvl(resolved.value);
                Fetched::fresh(resolved.value, resolved.stage)
            }
            None => Fetched::cached(self.cache.tvl()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_TVL_USD;
    use crate::cascade::Origin;
    use crate::relay::RelayEndpoint;
    use crate::sources::test_support::setup;
    use crate::testing::Reply;
    use serde_json::json;

    #[test]
    fn test_last_point_wins() {
        let body = json!([
            { "date": "1760400000", "totalLiquidityUSD": 80e9 },
            { "date": "1760486400", "totalLiquidityUSD": 81e9 },
            { "date": "1760572800", "totalLiquidityUSD": 82.5e9 }
        ]);
        assert_eq!(parse_latest_tvl(&body).unwrap(), 82.5e9);
    }

    #[test]
    fn test_legacy_field_name() {
        assert_eq!(parse_latest_tvl(&json!([{ "totalLiquidity": 1.0e9 }])).unwrap(), 1.0e9);
    }

    #[test]
    fn test_empty_or_zero_is_invalid() {
        assert!(parse_latest_tvl(&json!([])).unwrap_err().is_shape());
        assert!(parse_latest_tvl(&json!([{ "totalLiquidityUSD": 0 }])).unwrap_err().is_shape());
        assert!(parse_latest_tvl(&json!({ "message": "down" })).unwrap_err().is_shape());
    }

    #[tokio::test]
    async fn test_zero_value_never_reaches_cache() {
        let (transport, fetcher, cache) = setup();
        transport.set(
            RelayEndpoint::corsproxy().wrap(DEFILLAMA_CHARTS_URL),
            Reply::Json(json!([{ "totalLiquidityUSD": 0 }])),
        );

        let fetched = TvlClient::new(fetcher, cache.clone()).fetch().await;

        assert_eq!(fetched.origin, Origin::Cached);
        assert_eq!(fetched.value, DEFAULT_TVL_USD);
        assert_eq!(cache.tvl(), DEFAULT_TVL_USD);
    }
}
