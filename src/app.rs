//! Refresh cycle entry point
//!
//! One cycle fans out to every source, waits for all of them, then derives
//! the analysis and the regional schedule from the settled snapshot.

use crate::analysis::{analyze, current_session, regional_status_at, Analysis, RegionStatus, TradingSession};
use crate::config::PulseConfig;
use crate::feeds::{FeedSettings, FreshnessReport, HttpTransport, MarketFeeds, SharedSnapshotCache, SnapshotCache};
use crate::types::{DataKind, MarketSnapshot};
use anyhow::Context;
use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Everything a consumer receives for one cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseCycle {
    pub completed_at: DateTime<Utc>,
    pub snapshot: MarketSnapshot,
    /// `None` when there is no crypto data to analyze
    pub analysis: Option<Analysis>,
    pub regions: Vec<RegionStatus>,
    pub session: TradingSession,
    pub freshness: FreshnessReport,
}

impl PulseCycle {
    /// One-line status for the cycle log
    pub fn report_line(&self) -> String {
        let analysis = match &self.analysis {
            Some(a) => format!(
                "index {} phase {:?} risk {:?} avg {:+.2}%",
                a.composite_index, a.crypto_phase, a.risk.level, a.avg_change
            ),
            None => "no analysis".to_string(),
        };
        let stale: Vec<&str> = self.freshness.stale_kinds().iter().map(DataKind::as_str).collect();
        let stale = if stale.is_empty() {
            String::new()
        } else {
            format!(" | cached: {}", stale.join(","))
        };

        format!(
            "{} | {}/{} fresh | {}{}",
            self.session.label(),
            self.freshness.fresh_count(),
            self.freshness.origins.len(),
            analysis,
            stale
        )
    }
}

pub struct PulseApp {
    feeds: MarketFeeds,
    cycle_guard: Mutex<()>,
}

impl PulseApp {
    /// App over real HTTP with a freshly seeded cache
    pub fn new(config: &PulseConfig) -> anyhow::Result<Self> {
        let feeds = MarketFeeds::new(&config.feed_settings(), SnapshotCache::seeded())
            .context("Failed to build HTTP transport")?;
        Ok(Self::from_feeds(feeds))
    }

    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        settings: &FeedSettings,
        cache: SharedSnapshotCache,
    ) -> Self {
        Self::from_feeds(MarketFeeds::with_transport(transport, settings, cache))
    }

    fn from_feeds(feeds: MarketFeeds) -> Self {
        Self {
            feeds,
            cycle_guard: Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &SharedSnapshotCache {
        self.feeds.cache()
    }

    /// Run one refresh cycle
    ///
    /// Concurrent callers queue up behind each other; cycles never overlap.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> PulseCycle {
        let _guard = self.cycle_guard.lock().await;

        let feed_cycle = self.feeds.refresh().await;
        let snapshot = feed_cycle.snapshot;
        let analysis = analyze(snapshot.crypto.as_ref(), Some(&snapshot.metals));

        let cycle = PulseCycle {
            completed_at: now,
            analysis,
            regions: regional_status_at(now),
            session: current_session(now.hour()),
            freshness: feed_cycle.freshness,
            snapshot,
        };

        info!("Cycle complete: {}", cycle.report_line());
        cycle
    }
}
