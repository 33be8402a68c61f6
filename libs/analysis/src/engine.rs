//! Composite market-health analysis
//!
//! Everything is derived from the mean 24h change of the crypto assets
//! present, plus the gold price. Thresholds overlap: the phase is
//! resolved in priority order and the two gold thresholds are independent.

use crate::signals::{
    Analysis, Anomaly, AnomalyKind, Flow, GoldTrend, InflationRisk, LiquiditySignals, LiquidityStatus, MarketPhase,
    MaterialsSignals, RiskLevel, RiskSignals, SentimentLabel, Volatility,
};
use pulse_types::{CryptoPrices, MetalsPrices};
use tracing::debug;

const RISK_BAND: f64 = 1.5;
const HIGH_VOLATILITY: f64 = 3.0;
const GROWTH_ABOVE: f64 = 2.0;
const CAPITULATION_BELOW: f64 = -2.0;
const RECOVERY_ABOVE: f64 = 0.5;
const GOLD_TREND_ABOVE: f64 = 2040.0;
const GOLD_INFLATION_ABOVE: f64 = 2050.0;
const ANOMALY_DEVIATION: f64 = 3.0;

const INDEX_BASE: f64 = 50.0;
const INDEX_CHANGE_WEIGHT: f64 = 2.0;
const INDEX_GOLD_UP_BONUS: f64 = 5.0;
const INDEX_HIGH_RISK_PENALTY: f64 = 15.0;
const INDEX_LOW_RISK_BONUS: f64 = 10.0;

/// Derive the full analysis, or `None` when either input is missing
///
/// An empty crypto map counts as missing: there is no average to build on.
pub fn analyze(crypto: Option<&CryptoPrices>, metals: Option<&MetalsPrices>) -> Option<Analysis> {
    let crypto = crypto?;
    let metals = metals?;
    let avg_change = average_change(crypto)?;

    let risk = classify_risk(avg_change);
    let crypto_phase = classify_phase(avg_change);
    let materials = classify_materials(metals.gold);
    let liquidity = classify_liquidity(avg_change);
    let composite_index = composite_index(avg_change, &materials, &risk);
    let anomalies = detect_anomalies(crypto, avg_change);

    debug!(
        "Analysis: avg {:.2}% phase {:?} risk {:?} index {}",
        avg_change, crypto_phase, risk.level, composite_index
    );

    Some(Analysis {
        risk,
        liquidity,
        materials,
        crypto_phase,
        avg_change,
        composite_index,
        anomalies,
        summary_text: crypto_phase.summary().to_string(),
    })
}

/// Mean 24h change over the assets actually present
pub fn average_change(crypto: &CryptoPrices) -> Option<f64> {
    if crypto.is_empty() {
        return None;
    }
    let total: f64 = crypto.values().map(|q| q.change_24h).sum();
    Some(total / crypto.len() as f64)
}

pub fn classify_risk(avg_change: f64) -> RiskSignals {
    let (level, sentiment_label) = if avg_change < -RISK_BAND {
        (RiskLevel::High, SentimentLabel::Fear)
    } else if avg_change > RISK_BAND {
        (RiskLevel::Low, SentimentLabel::Greed)
    } else {
        (RiskLevel::Medium, SentimentLabel::Neutral)
    };

    let volatility = if avg_change.abs() > HIGH_VOLATILITY {
        Volatility::High
    } else {
        Volatility::Normal
    };

    RiskSignals {
        level,
        volatility,
        sentiment_label,
    }
}

/// First match wins
pub fn classify_phase(avg_change: f64) -> MarketPhase {
    if avg_change > GROWTH_ABOVE {
        MarketPhase::Growth
    } else if avg_change < CAPITULATION_BELOW {
        MarketPhase::Capitulation
    } else if avg_change > RECOVERY_ABOVE {
        MarketPhase::Recovery
    } else {
        MarketPhase::Accumulation
    }
}

pub fn classify_materials(gold: f64) -> MaterialsSignals {
    MaterialsSignals {
        gold_trend: if gold > GOLD_TREND_ABOVE { GoldTrend::Up } else { GoldTrend::Neutral },
        inflation_risk: if gold > GOLD_INFLATION_ABOVE {
            InflationRisk::High
        } else {
            InflationRisk::Low
        },
    }
}

/// Zero change counts as contracting
pub fn classify_liquidity(avg_change: f64) -> LiquiditySignals {
    if avg_change > 0.0 {
        LiquiditySignals {
            status: LiquidityStatus::Expanding,
            flow: Flow::Inflow,
        }
    } else {
        LiquiditySignals {
            status: LiquidityStatus::Contracting,
            flow: Flow::Outflow,
        }
    }
}

/// 50 ± weighted trend, gold and risk adjustments, clamped to 0..=100
pub fn composite_index(avg_change: f64, materials: &MaterialsSignals, risk: &RiskSignals) -> u8 {
    let mut score = INDEX_BASE + avg_change * INDEX_CHANGE_WEIGHT;

    if materials.gold_trend == GoldTrend::Up {
        score += INDEX_GOLD_UP_BONUS;
    }
    match risk.level {
        RiskLevel::High => score -= INDEX_HIGH_RISK_PENALTY,
        RiskLevel::Low => score += INDEX_LOW_RISK_BONUS,
        RiskLevel::Medium => {}
    }

    score.clamp(0.0, 100.0).round() as u8
}

/// Assets deviating more than 3 points from the average
///
/// Never empty: with nothing to report the list holds the "none" marker.
pub fn detect_anomalies(crypto: &CryptoPrices, avg_change: f64) -> Vec<Anomaly> {
    let mut anomalies: Vec<Anomaly> = crypto
        .iter()
        .filter(|(_, quote)| (quote.change_24h - avg_change).abs() > ANOMALY_DEVIATION)
        .map(|(asset, quote)| Anomaly {
            asset: asset.to_uppercase(),
            kind: if quote.change_24h > avg_change {
                AnomalyKind::Pump
            } else {
                AnomalyKind::Dump
            },
            magnitude: quote.change_24h.abs(),
        })
        .collect();

    if anomalies.is_empty() {
        anomalies.push(Anomaly::none_found());
    }
    anomalies
}
