//! One refresh across all seven sources
//!
//! The sources are fanned out concurrently and joined; nothing is handed to
//! the caller until every source has settled on a fresh or cached value.

use crate::cache::SharedSnapshotCache;
use crate::cascade::{Fetcher, Origin};
use crate::endpoints::CLOUDFLARE_ETH_RPC;
use crate::error::Result;
use crate::relay::{default_relays, ProxyRelay, RelayEndpoint};
use crate::sources::{
    CryptoClient, FiatClient, GasClient, MetalsClient, NewsClient, SentimentClient, SourceClient, TvlClient,
};
use crate::transport::{HttpTransport, ReqwestTransport};
use pulse_types::{DataKind, MarketSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Network settings for the source clients
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub relays: Vec<RelayEndpoint>,
    pub gas_rpc_endpoints: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            relays: default_relays(),
            gas_rpc_endpoints: vec![CLOUDFLARE_ETH_RPC.to_string()],
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Where each data kind came from in one refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FreshnessReport {
    pub origins: BTreeMap<DataKind, Origin>,
}

impl FreshnessReport {
    pub fn record(&mut self, kind: DataKind, origin: Origin) {
        self.origins.insert(kind, origin);
    }

    pub fn origin(&self, kind: DataKind) -> Option<&Origin> {
        self.origins.get(&kind)
    }

    pub fn fresh_count(&self) -> usize {
        self.origins.values().filter(|o| o.is_fresh()).count()
    }

    /// Kinds that were served from the cache
    pub fn stale_kinds(&self) -> Vec<DataKind> {
        self.origins
            .iter()
            .filter(|(_, origin)| !origin.is_fresh())
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn is_fully_cached(&self) -> bool {
        self.fresh_count() == 0
    }
}

/// Result of one refresh
#[derive(Debug, Clone, PartialEq)]
pub struct FeedCycle {
    pub snapshot: MarketSnapshot,
    pub freshness: FreshnessReport,
}

/// The seven source clients sharing one transport and one cache
pub struct MarketFeeds {
    crypto: CryptoClient,
    fiat: FiatClient,
    metals: MetalsClient,
    sentiment: SentimentClient,
    tvl: TvlClient,
    gas: GasClient,
    news: NewsClient,
    cache: SharedSnapshotCache,
}

impl MarketFeeds {
    /// Feeds over a real HTTP client
    pub fn new(settings: &FeedSettings, cache: SharedSnapshotCache) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(settings.request_timeout)?);
        Ok(Self::with_transport(transport, settings, cache))
    }

    /// Feeds over any transport
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        settings: &FeedSettings,
        cache: SharedSnapshotCache,
    ) -> Self {
        let relay = ProxyRelay::new(transport.clone(), settings.relays.clone());
        let fetcher = Arc::new(Fetcher::new(transport, relay));

        Self {
            crypto: CryptoClient::new(fetcher.clone(), cache.clone()),
            fiat: FiatClient::new(fetcher.clone(), cache.clone()),
            metals: MetalsClient::new(fetcher.clone(), cache.clone()),
            sentiment: SentimentClient::new(fetcher.clone(), cache.clone()),
            tvl: TvlClient::new(fetcher.clone(), cache.clone()),
            gas: GasClient::new(fetcher.clone(), cache.clone(), &settings.gas_rpc_endpoints),
            news: NewsClient::new(fetcher, cache.clone()),
            cache,
        }
    }

    pub fn cache(&self) -> &SharedSnapshotCache {
        &self.cache
    }

    /// Fetch every source concurrently and assemble the snapshot
    pub async fn refresh(&self) -> FeedCycle {
        let (crypto, fiat, metals, sentiment, tvl, gas, news) = tokio::join!(
            self.crypto.fetch(),
            self.fiat.fetch(),
            self.metals.fetch(),
            self.sentiment.fetch(),
            self.tvl.fetch(),
            self.gas.fetch(),
            self.news.fetch(),
        );

        let mut freshness = FreshnessReport::default();
        freshness.record(self.crypto.kind(), crypto.origin);
        freshness.record(self.fiat.kind(), fiat.origin);
        freshness.record(self.metals.kind(), metals.origin);
        freshness.record(self.sentiment.kind(), sentiment.origin);
        freshness.record(self.tvl.kind(), tvl.origin);
        freshness.record(self.gas.kind(), gas.origin);
        freshness.record(self.news.kind(), news.origin);

        debug!("Refresh settled: {}/7 fresh", freshness.fresh_count());

        FeedCycle {
            snapshot: MarketSnapshot {
                crypto: crypto.value,
                fiat_rates: fiat.value,
                metals: metals.value,
                sentiment: sentiment.value,
                tvl: tvl.value,
                gas_price_gwei: gas.value,
                news: news.value,
            },
            freshness,
        }
    }
}
