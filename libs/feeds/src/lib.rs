//! Resilient market data feeds
//!
//! Seven source clients (crypto, fiat, metals, sentiment, tvl, gas, news)
//! that always produce a value. Each walks its own cascade of upstreams,
//! direct where allowed and otherwise through CORS relays, and falls back to
//! the last known good value when every upstream fails.

pub mod cache;
pub mod cascade;
pub mod endpoints;
pub mod error;
pub mod feeds;
pub mod relay;
pub mod sources;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::{SharedSnapshotCache, SnapshotCache};
pub use cascade::{Cascade, Fetched, Fetcher, Origin, Request, Resolved, Route, Stage};
pub use error::{FeedError, Result};
pub use feeds::{FeedCycle, FeedSettings, FreshnessReport, MarketFeeds};
pub use relay::{default_relays, Envelope, ProxyRelay, RelayEndpoint};
pub use sources::SourceClient;
pub use transport::{HttpTransport, ReqwestTransport};
