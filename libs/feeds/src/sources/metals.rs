//! Precious metals via tokenized proxies on CoinGecko
//!
//! Each metal is updated on its own: an answer carrying gold but not silver
//! refreshes gold and keeps the cached silver.

use super::{lenient_f64, positive_finite, SourceClient};
use crate::cache::SharedSnapshotCache;
use crate::cascade::{Cascade, Fetched, Fetcher, Stage};
use crate::endpoints::{COINGECKO_METALS_URL, METAL_PROXIES};
use crate::error::{FeedError, Result};
use async_trait::async_trait;
use pulse_types::{DataKind, Metal, MetalsPrices};
use serde_json::Value;
use std::sync::Arc;

/// Fresh price for a single metal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetalQuote {
    pub metal: Metal,
    pub price: f64,
    pub change: f64,
}

fn parse_metals(body: &Value) -> Result<Vec<MetalQuote>> {
    let quotes: Vec<MetalQuote> = METAL_PROXIES
        .iter()
        .filter_map(|(id, metal)| {
            let entry = body.get(*id)?;
            let price = positive_finite(entry.get("usd").and_then(lenient_f64)?)?;
            let change = entry
                .get("usd_24h_change")
                .and_then(lenient_f64)
                .filter(|c| c.is_finite())
                .unwrap_or(0.0);
            Some(MetalQuote {
                metal: *metal,
                price,
                change,
            })
        })
        .collect();

    if quotes.is_empty() {
        return Err(FeedError::shape("no metal proxy in response"));
    }
    Ok(quotes)
}

pub struct MetalsClient {
    cascade: Cascade<Vec<MetalQuote>>,
    fetcher: Arc<Fetcher>,
    cache: SharedSnapshotCache,
}

impl MetalsClient {
    pub fn new(fetcher: Arc<Fetcher>, cache: SharedSnapshotCache) -> Self {
        let cascade = Cascade::new(DataKind::Metals)
            .then(Stage::via_relay("coingecko proxies", COINGECKO_METALS_URL, parse_metals));

        Self { cascade, fetcher, cache }
    }
}

#[async_trait]
impl SourceClient for MetalsClient {
    type Output = MetalsPrices;

    fn kind(&self) -> DataKind {
        DataKind::Metals
    }

    async fn fetch(&self) -> Fetched<MetalsPrices> {
        match self.cascade.resolve(&self.fetcher).await {
            Some(resolved) => {
                let merged = self.cache.update_metals(|metals| {
                    for quote in &resolved.value {
                        metals.set(quote.metal, quote.price, quote.change);
                    }
                });
                Fetched::fresh(merged, resolved.stage)
            }
            None => Fetched::cached(self.cache.metals()),
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
    fn test_parse_partial_response() {
        let quotes = parse_metals(&json!({
            "pax-gold": { "usd": 2612.4, "usd_24h_change": 0.4 },
            "palladium-token": { "usd": 1010.0 }
        }))
        .unwrap();

        assert_eq!(
            quotes,
            vec![
                MetalQuote { metal: Metal::Gold, price: 2612.4, change: 0.4 },
                MetalQuote { metal: Metal::Palladium, price: 1010.0, change: 0.0 },
            ]
        );
    }

    #[test]
    fn test_no_proxies_is_shape_error() {
        assert!(parse_metals(&json!({})).unwrap_err().is_shape());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_metals() {
        let (transport, fetcher, cache) = setup();
        transport.set(
            RelayEndpoint::corsproxy().wrap(COINGECKO_METALS_URL),
            Reply::Json(json!({ "pax-gold": { "usd": 2612.4, "usd_24h_change": 0.4 } })),
        );

        let fetched = MetalsClient::new(fetcher, cache.clone()).fetch().await;

        assert!(fetched.origin.is_fresh());
        assert_eq!(fetched.value.gold, 2612.4);
        assert_eq!(fetched.value.gold_change, 0.4);
        assert_eq!(fetched.value.silver, 29.5);
        assert_eq!(fetched.value.platinum, 985.0);
        assert_eq!(cache.metals(), fetched.value);
    }

    #[tokio::test]
    async fn test_failure_serves_seeded_defaults() {
        let (_transport, fetcher, cache) = setup();

        let fetched = MetalsClient::new(fetcher, cache).fetch().await;

        assert_eq!(fetched.origin, Origin::Cached);
        assert_eq!(fetched.value, MetalsPrices::default());
    }
}
