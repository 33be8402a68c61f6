//! Last-known-good store
//!
//! One slot per data kind. Each slot is written only by the source client
//! that owns it, and only after that client produced a validated value, so a
//! failed fetch never clears or degrades what is stored. Slots start out
//! seeded with sane defaults; crypto and fiat start as "no data" because a
//! made-up price would feed a misleading analysis.

use parking_lot::RwLock;
use pulse_types::{CryptoPrices, FiatRates, MarketSnapshot, MetalsPrices, NewsItem, Sentiment};
use std::sync::Arc;

pub const DEFAULT_TVL_USD: f64 = 75_000_000_000.0;
pub const DEFAULT_GAS_GWEI: u64 = 25;

/// Cache handle passed into every source client
pub type SharedSnapshotCache = Arc<SnapshotCache>;

#[derive(Debug)]
pub struct SnapshotCache {
    crypto: RwLock<Option<CryptoPrices>>,
    fiat: RwLock<Option<FiatRates>>,
    metals: RwLock<MetalsPrices>,
    sentiment: RwLock<Sentiment>,
    tvl: RwLock<f64>,
    gas: RwLock<u64>,
    news: RwLock<Vec<NewsItem>>,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self {
            crypto: RwLock::new(None),
            fiat: RwLock::new(None),
            metals: RwLock::new(MetalsPrices::default()),
            sentiment: RwLock::new(Sentiment::default()),
            tvl: RwLock::new(DEFAULT_TVL_USD),
            gas: RwLock::new(DEFAULT_GAS_GWEI),
            news: RwLock::new(Vec::new()),
        }
    }
}

impl SnapshotCache {
    /// Cache seeded with defaults, ready to share
    pub fn seeded() -> SharedSnapshotCache {
        Arc::new(Self::default())
    }

    pub fn crypto(&self) -> Option<CryptoPrices> {
        self.crypto.read().clone()
    }

    pub fn fiat(&self) -> Option<FiatRates> {
        self.fiat.read().clone()
    }

    pub fn metals(&self) -> MetalsPrices {
        *self.metals.read()
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment.read().clone()
    }

    pub fn tvl(&self) -> f64 {
        *self.tvl.read()
    }

    pub fn gas(&self) -> u64 {
        *self.gas.read()
    }

    pub fn news(&self) -> Vec<NewsItem> {
        self.news.read().clone()
    }

    /// Everything currently stored, as one snapshot
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            crypto: self.crypto(),
            fiat_rates: self.fiat(),
            metals: self.metals(),
            sentiment: self.sentiment(),
            tvl: self.tvl(),
            gas_price_gwei: self.gas(),
            news: self.news(),
        }
    }

    pub(crate) fn store_crypto(&self, prices: CryptoPrices) {
        *self.crypto.write() = Some(prices);
    }

    pub(crate) fn store_fiat(&self, rates: FiatRates) {
        *self.fiat.write() = Some(rates);
    }

    /// Apply a partial metals update in place and return the merged result
    pub(crate) fn update_metals(&self, apply: impl FnOnce(&mut MetalsPrices)) -> MetalsPrices {
        let mut metals = self.metals.write();
        apply(&mut metals);
        *metals
    }

    pub(crate) fn store_sentiment(&self, sentiment: Sentiment) {
        *self.sentiment.write() = sentiment;
    }

    pub(crate) fn store_tvl(&self, tvl: f64) {
        *self.tvl.write() = tvl;
    }

    pub(crate) fn store_gas(&self, gwei: u64) {
        *self.gas.write() = gwei;
    }

    pub(crate) fn store_news(&self, news: Vec<NewsItem>) {
        *self.news.write() = news;
    }
}
