//! Market Pulse data model
//!
//! Plain data shared by the feed clients, the analysis engine and whatever
//! presentation layer consumes a refresh cycle. No behaviour lives here
//! beyond construction helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ticker symbol of a tracked crypto asset (`BTC`, `ETH`, ...)
pub type AssetSymbol = String;

/// ISO currency code (`EUR`, `UAH`, ...)
pub type CurrencyCode = String;

/// Crypto prices keyed by asset symbol, in one canonical shape regardless of
/// which provider served them
pub type CryptoPrices = BTreeMap<AssetSymbol, CryptoQuote>;

// =============================================================================
// Data kinds
// =============================================================================

/// One kind of market data, each served by its own source client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataKind {
    Crypto,
    Fiat,
    Metals,
    Sentiment,
    Tvl,
    Gas,
    News,
}

impl DataKind {
    pub const ALL: [DataKind; 7] = [
        DataKind::Crypto,
        DataKind::Fiat,
        DataKind::Metals,
        DataKind::Sentiment,
        DataKind::Tvl,
        DataKind::Gas,
        DataKind::News,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Crypto => "crypto",
            DataKind::Fiat => "fiat",
            DataKind::Metals => "metals",
            DataKind::Sentiment => "sentiment",
            DataKind::Tvl => "tvl",
            DataKind::Gas => "gas",
            DataKind::News => "news",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Crypto
// =============================================================================

/// Spot price and 24h change (percent) of one crypto asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoQuote {
    pub price: f64,
    pub change_24h: f64,
}

impl CryptoQuote {
    pub fn new(price: f64, change_24h: f64) -> Self {
        Self { price, change_24h }
    }
}

// =============================================================================
// Fiat
// =============================================================================

/// Exchange rates against a base currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiatRates {
    pub base: CurrencyCode,
    pub rates: BTreeMap<CurrencyCode, f64>,
}

impl FiatRates {
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }
}

// =============================================================================
// Metals
// =============================================================================

/// Precious metals tracked through tokenized proxy assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metal {
    Gold,
    Silver,
    Platinum,
    Palladium,
}

impl Metal {
    pub const ALL: [Metal; 4] = [Metal::Gold, Metal::Silver, Metal::Platinum, Metal::Palladium];
}

/// Metal prices (USD) with their 24h change (percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetalsPrices {
    pub gold: f64,
    pub silver: f64,
    pub platinum: f64,
    pub palladium: f64,
    pub gold_change: f64,
    pub silver_change: f64,
    pub platinum_change: f64,
    pub palladium_change: f64,
}

impl Default for MetalsPrices {
    fn default() -> Self {
        Self {
            gold: 2450.0,
            silver: 29.5,
            platinum: 985.0,
            palladium: 995.0,
            gold_change: 0.0,
            silver_change: 0.0,
            platinum_change: 0.0,
            palladium_change: 0.0,
        }
    }
}

impl MetalsPrices {
    /// Price of a single metal
    pub fn price(&self, metal: Metal) -> f64 {
        match metal {
            Metal::Gold => self.gold,
            Metal::Silver => self.silver,
            Metal::Platinum => self.platinum,
            Metal::Palladium => self.palladium,
        }
    }

    /// Overwrite one metal, leaving the other three untouched
    pub fn set(&mut self, metal: Metal, price: f64, change: f64) {
        let (p, c) = match metal {
            Metal::Gold => (&mut self.gold, &mut self.gold_change),
            Metal::Silver => (&mut self.silver, &mut self.silver_change),
            Metal::Platinum => (&mut self.platinum, &mut self.platinum_change),
            Metal::Palladium => (&mut self.palladium, &mut self.palladium_change),
        };
        *p = price;
        *c = change;
    }
}

// =============================================================================
// Sentiment / News
// =============================================================================

/// Fear & greed index reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentiment {
    /// 0 (extreme fear) ..= 100 (extreme greed)
    pub value: u8,
    pub classification: String,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self {
            value: 50,
            classification: "Neutral".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
}

// =============================================================================
// Snapshot
// =============================================================================

/// Everything one refresh cycle produced, fresh or cached
///
/// Built once per cycle and replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// `None` until some provider has answered at least once
    pub crypto: Option<CryptoPrices>,
    pub fiat_rates: Option<FiatRates>,
    pub metals: MetalsPrices,
    pub sentiment: Sentiment,
    /// Total value locked across DeFi, USD
    pub tvl: f64,
    pub gas_price_gwei: u64,
    /// At most five items, in source order
    pub news: Vec<NewsItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metal_set_touches_only_one_metal() {
        let mut metals = MetalsPrices::default();
        metals.set(Metal::Silver, 31.2, 1.5);

        assert_eq!(metals.silver, 31.2);
        assert_eq!(metals.silver_change, 1.5);
        assert_eq!(metals.gold, 2450.0);
        assert_eq!(metals.platinum, 985.0);
        assert_eq!(metals.palladium, 995.0);
    }

    #[test]
    fn test_snapshot_field_names() {
        let snapshot = MarketSnapshot {
            crypto: Some(CryptoPrices::from([("BTC".to_string(), CryptoQuote::new(60_000.0, 2.5))])),
            fiat_rates: None,
            metals: MetalsPrices::default(),
            sentiment: Sentiment::default(),
            tvl: 75e9,
            gas_price_gwei: 25,
            news: Vec::new(),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["crypto"]["BTC"]["change24h"], 2.5);
        assert!(json["fiatRates"].is_null());
        assert_eq!(json["gasPriceGwei"], 25);
        assert_eq!(json["metals"]["goldChange"], 0.0);
    }

    #[test]
    fn test_data_kind_display() {
        assert_eq!(DataKind::Tvl.to_string(), "tvl");
        assert_eq!(DataKind::ALL.len(), 7);
    }
}
