//! Market analysis
//!
//! Pure, synchronous derivations over a market snapshot: the composite
//! market-health index with its categorical signals, and the schedule-only
//! regional session table.

pub mod engine;
pub mod regions;
pub mod signals;

pub use engine::analyze;
pub use regions::{current_session, regional_status, regional_status_at, RegionStatus, RegionTrend, TradingSession};
pub use signals::{
    Analysis, Anomaly, AnomalyKind, Flow, GoldTrend, InflationRisk, LiquiditySignals, LiquidityStatus, MarketPhase,
    MaterialsSignals, RiskLevel, RiskSignals, SentimentLabel, Volatility,
};
