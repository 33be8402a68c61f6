//! Crypto prices: CoinGecko, then CryptoCompare, both through the relay
//!
//! CryptoCompare answers are first remapped into CoinGecko's shape, so the
//! canonical conversion and everything downstream only ever see one shape.

use super::{lenient_f64, positive_finite, SourceClient};
use crate::cache::SharedSnapshotCache;
use crate::cascade::{Cascade, Fetched, Fetcher, Stage};
use crate::endpoints::{COINGECKO_CRYPTO_URL, CRYPTOCOMPARE_CRYPTO_URL, TRACKED_ASSETS};
use crate::error::{FeedError, Result};
use async_trait::async_trait;
use pulse_types::{CryptoPrices, CryptoQuote, DataKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

const ANCHOR_ID: &str = "bitcoin";

/// One entry of CoinGecko's `simple/price` answer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinGeckoQuote {
    pub usd: f64,
    pub usd_24h_change: f64,
}

/// CoinGecko `simple/price` answer keyed by CoinGecko id
pub type CoinGeckoPrices = BTreeMap<String, CoinGeckoQuote>;

fn valid_quote(price: Option<f64>, change: Option<f64>) -> Option<CoinGeckoQuote> {
    let usd = positive_finite(price?)?;
    let usd_24h_change = change.filter(|c| c.is_finite())?;
    Some(CoinGeckoQuote { usd, usd_24h_change })
}

/// Tracked, well-formed entries of a CoinGecko body
pub fn read_coingecko(body: &Value) -> CoinGeckoPrices {
    TRACKED_ASSETS
        .iter()
        .filter_map(|(id, _)| {
            let entry = body.get(*id)?;
            let quote = valid_quote(
                entry.get("usd").and_then(lenient_f64),
                entry.get("usd_24h_change").and_then(lenient_f64),
            )?;
            Some((id.to_string(), quote))
        })
        .collect()
}

/// Remap a CryptoCompare `pricemultifull` body into CoinGecko's shape
///
/// `RAW.<SYM>.USD.PRICE` becomes `<id>.usd` and `RAW.<SYM>.USD.CHANGEPCT24HOUR`
/// becomes `<id>.usd_24h_change`. Symbols missing from the body are skipped.
pub fn cryptocompare_to_coingecko(body: &Value) -> CoinGeckoPrices {
    let Some(raw) = body.get("RAW") else {
        return CoinGeckoPrices::new();
    };

    TRACKED_ASSETS
        .iter()
        .filter_map(|(id, symbol)| {
            let usd = raw.get(*symbol)?.get("USD")?;
            let quote = valid_quote(
                usd.get("PRICE").and_then(lenient_f64),
                usd.get("CHANGEPCT24HOUR").and_then(lenient_f64),
            )?;
            Some((id.to_string(), quote))
        })
        .collect()
}

/// CoinGecko shape → canonical symbol-keyed prices
pub fn to_canonical(prices: &CoinGeckoPrices) -> CryptoPrices {
    TRACKED_ASSETS
        .iter()
        .filter_map(|(id, symbol)| {
            let quote = prices.get(*id)?;
            Some((symbol.to_string(), CryptoQuote::new(quote.usd, quote.usd_24h_change)))
        })
        .collect()
}

fn require_assets(prices: CoinGeckoPrices, provider: &str) -> Result<CryptoPrices> {
    let canonical = to_canonical(&prices);
    if canonical.is_empty() {
        return Err(FeedError::shape(format!("{} response has no tracked asset", provider)));
    }
    Ok(canonical)
}

/// CoinGecko answers count only when the `bitcoin` anchor entry is usable;
/// a rate-limited body can still carry a few stray coins.
fn parse_coingecko(body: &Value) -> Result<CryptoPrices> {
    let prices = read_coingecko(body);
    if !prices.contains_key(ANCHOR_ID) {
        return Err(FeedError::shape(format!("coingecko response has no usable {} entry", ANCHOR_ID)));
    }
    require_assets(prices, "coingecko")
}

fn parse_cryptocompare(body: &Value) -> Result<CryptoPrices> {
    require_assets(cryptocompare_to_coingecko(body), "cryptocompare")
}

pub struct CryptoClient {
    cascade: Cascade<CryptoPrices>,
    fetcher: Arc<Fetcher>,
    cache: SharedSnapshotCache,
}

impl CryptoClient {
    pub fn new(fetcher: Arc<Fetcher>, cache: SharedSnapshotCache) -> Self {
        let cascade = Cascade::new(DataKind::Crypto)
            .then(Stage::via_relay("coingecko", COINGECKO_CRYPTO_URL, parse_coingecko))
            .then(Stage::via_relay("cryptocompare", CRYPTOCOMPARE_CRYPTO_URL, parse_cryptocompare));

        Self { cascade, fetcher, cache }
    }
}

#[async_trait]
impl SourceClient for CryptoClient {
    type Output = Option<CryptoPrices>;

    fn kind(&self) -> DataKind {
        DataKind::Crypto
    }

    async fn fetch(&self) -> Fetched<Option<CryptoPrices>> {
        match self.cascade.resolve(&self.fetcher).await {
            Some(resolved) => {
                self.cache.store_crypto(resolved.value.clone());
                Fetched::fresh(Some(resolved.value), resolved.stage)
            }
            None => Fetched::cached(self.cache.crypto()),
        }
    }
}
