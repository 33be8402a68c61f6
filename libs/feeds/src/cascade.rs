//! Fetch cascade
//!
//! Each data kind is resolved by walking an ordered list of stages: direct
//! calls to upstreams that allow them, then upstreams reached through the
//! relay, then the last known good value. Stages run strictly one after the
//! other and the first one that produces a valid value stops the walk.
//!
//! A stage is plain data (a route plus a parser), so the order is visible at
//! construction and every stage can be exercised on its own.

use crate::error::Result;
use crate::relay::ProxyRelay;
use crate::transport::HttpTransport;
use pulse_types::DataKind;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns a raw upstream body into a validated value, or a shape error
pub type Parser<T> = fn(&Value) -> Result<T>;

// =============================================================================
// Routes
// =============================================================================

/// Request sent straight to an upstream
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Get(String),
    Post { url: String, body: Value },
}

/// How a stage reaches its upstream
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Direct(Request),
    /// GET forwarded through the relay chain
    ViaRelay(String),
}

/// Network access shared by all source clients
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    relay: ProxyRelay,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, relay: ProxyRelay) -> Self {
        Self { transport, relay }
    }

    pub async fn fetch(&self, route: &Route) -> Result<Value> {
        match route {
            Route::Direct(Request::Get(url)) => self.transport.get_json(url).await,
            Route::Direct(Request::Post { url, body }) => self.transport.post_json(url, body).await,
            Route::ViaRelay(url) => self.relay.relay(url).await,
        }
    }
}

// =============================================================================
// Stages
// =============================================================================

/// One attempt in a cascade
pub struct Stage<T> {
    label: String,
    route: Route,
    parse: Parser<T>,
}

impl<T> Stage<T> {
    pub fn new(label: impl Into<String>, route: Route, parse: Parser<T>) -> Self {
        Self {
            label: label.into(),
            route,
            parse,
        }
    }

    pub fn direct_get(label: impl Into<String>, url: impl Into<String>, parse: Parser<T>) -> Self {
        Self::new(label, Route::Direct(Request::Get(url.into())), parse)
    }

    pub fn direct_post(label: impl Into<String>, url: impl Into<String>, body: Value, parse: Parser<T>) -> Self {
        Self::new(
            label,
            Route::Direct(Request::Post {
                url: url.into(),
                body,
            }),
            parse,
        )
    }

    pub fn via_relay(label: impl Into<String>, url: impl Into<String>, parse: Parser<T>) -> Self {
        Self::new(label, Route::ViaRelay(url.into()), parse)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Fetch and validate; any failure means "move on"
    pub async fn attempt(&self, fetcher: &Fetcher) -> Result<T> {
        let body = fetcher.fetch(&self.route).await?;
        (self.parse)(&body)
    }
}

// =============================================================================
// Cascade
// =============================================================================

/// Value produced by a stage, tagged with the stage that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub stage: String,
    pub value: T,
}

/// Ordered stages for one data kind
pub struct Cascade<T> {
    kind: DataKind,
    stages: Vec<Stage<T>>,
}

impl<T: Send> Cascade<T> {
    pub fn new(kind: DataKind) -> Self {
        Self {
            kind,
            stages: Vec::new(),
        }
    }

    /// Append a stage after the existing ones
    pub fn then(mut self, stage: Stage<T>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn stages(&self) -> &[Stage<T>] {
        &self.stages
    }

    /// Walk the stages in order, returning the first valid value
    ///
    /// `None` means every stage failed; falling back to the cache is the
    /// caller's job.
    pub async fn resolve(&self, fetcher: &Fetcher) -> Option<Resolved<T>> {
        for stage in &self.stages {
            debug!("[{}] trying {}", self.kind, stage.label);

            match stage.attempt(fetcher).await {
                Ok(value) => {
                    debug!("[{}] {} ok", self.kind, stage.label);
                    return Some(Resolved {
                        stage: stage.label.clone(),
                        value,
                    });
                }
                Err(e) if e.is_shape() => {
                    warn!("[{}] {} returned unusable data: {}", self.kind, stage.label, e)
                }
                Err(e) => warn!("[{}] {} failed: {}", self.kind, stage.label, e),
            }
        }

        warn!("[{}] all {} stages failed, serving cached value", self.kind, self.stages.len());
        None
    }
}

// =============================================================================
// Results
// =============================================================================

/// Where a source client's value came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "lowercase")]
pub enum Origin {
    Fresh { stage: String },
    Cached,
}

impl Origin {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Origin::Fresh { .. })
    }
}

/// A source client's answer: always a value, fresh or cached
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Fetched<T> {
    pub fn fresh(value: T, stage: impl Into<String>) -> Self {
        Self {
            value,
            origin: Origin::Fresh { stage: stage.into() },
        }
    }

    pub fn cached(value: T) -> Self {
        Self {
            value,
            origin: Origin::Cached,
        }
    }
}
