//! Headlines from CryptoCompare, via relay

use super::SourceClient;
use crate::cache::SharedSnapshotCache;
use crate::cascade::{Cascade, Fetched, Fetcher, Stage};
use crate::endpoints::CRYPTOCOMPARE_NEWS_URL;
use crate::error::{FeedError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pulse_types::{DataKind, NewsItem};
use serde_json::Value;
use std::sync::Arc;

pub const MAX_NEWS_ITEMS: usize = 5;

fn read_item(item: &Value) -> Option<NewsItem> {
    let title = item.get("title")?.as_str()?.trim();
    if title.is_empty() {
        return None;
    }

    let source = item
        .get("source_info")
        .and_then(|info| info.get("name"))
        .or_else(|| item.get("source"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    let published_at = DateTime::<Utc>::from_timestamp(item.get("published_on")?.as_i64()?, 0)?;

    Some(NewsItem {
        title: title.to_string(),
        source: source.to_string(),
        published_at,
    })
}

/// First five items in source order
fn parse_news(body: &Value) -> Result<Vec<NewsItem>> {
    if body.get("Response").and_then(Value::as_str) == Some("Error") {
        let message = body.get("Message").and_then(Value::as_str).unwrap_or("unknown");
        return Err(FeedError::shape(format!("news api error: {}", message)));
    }

    let data = body
        .get("Data")
        .and_then(Value::as_array)
        .ok_or_else(|| FeedError::shape("missing Data"))?;

    Ok(data.iter().take(MAX_NEWS_ITEMS).filter_map(read_item).collect())
}

pub struct NewsClient {
    cascade: Cascade<Vec<NewsItem>>,
    fetcher: Arc<Fetcher>,
    cache: SharedSnapshotCache,
}

impl NewsClient {
    pub fn new(fetcher: Arc<Fetcher>, cache: SharedSnapshotCache) -> Self {
        let cascade = Cascade::new(DataKind::News)
            .then(Stage::via_relay("cryptocompare news", CRYPTOCOMPARE_NEWS_URL, parse_news));

        Self { cascade, fetcher, cache }
    }
}

#[async_trait]
impl SourceClient for NewsClient {
    type Output = Vec<NewsItem>;

    fn kind(&self) -> DataKind {
        DataKind::News
    }

    async fn fetch(&self) -> Fetched<Vec<NewsItem>> {
        match self.cascade.resolve(&self.fetcher).await {
            Some(resolved) => {
                self.cache.store_news(resolved.value.clone());
                Fetched::fresh(resolved.value, resolved.stage)
            }
            None => Fetched::cached(self.cache.news()),
        }
    }
}
