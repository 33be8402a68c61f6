//! Analysis output types
//!
//! Plain data handed to the presentation layer once per cycle.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Volatility {
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Fear,
    Neutral,
    Greed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquidityStatus {
    Expanding,
    Contracting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flow {
    Inflow,
    Outflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoldTrend {
    Up,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InflationRisk {
    Low,
    High,
}

/// Crypto market cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketPhase {
    Accumulation,
    Recovery,
    Growth,
    Capitulation,
}

impl MarketPhase {
    /// Fixed outlook message for the phase
    pub fn summary(&self) -> &'static str {
        match self {
            MarketPhase::Capitulation => {
                "HIGH VOLATILITY DETECTED. ASSETS UNDER PRESSURE. CAPITAL PROTECTION RECOMMENDED."
            }
            MarketPhase::Growth => "POSITIVE MOMENTUM. LIQUIDITY FLOWING INTO RISK ASSETS.",
            MarketPhase::Recovery => "LOCAL REBOUND. WATCH RESISTANCE LEVELS.",
            MarketPhase::Accumulation => "LOW VOLATILITY. CONSOLIDATION PHASE. MONITORING KEY LEVELS.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSignals {
    pub level: RiskLevel,
    pub volatility: Volatility,
    pub sentiment_label: SentimentLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquiditySignals {
    pub status: LiquidityStatus,
    pub flow: Flow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialsSignals {
    pub gold_trend: GoldTrend,
    pub inflation_risk: InflationRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    Pump,
    Dump,
    /// Only used by the "checked, nothing found" marker
    Normal,
}

/// Asset moving well away from the market average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub asset: String,
    pub kind: AnomalyKind,
    /// Absolute 24h change of the asset itself, percent
    pub magnitude: f64,
}

impl Anomaly {
    pub const NONE_ASSET: &'static str = "NONE";

    /// Marker emitted when no asset deviates enough
    pub fn none_found() -> Self {
        Self {
            asset: Self::NONE_ASSET.to_string(),
            kind: AnomalyKind::Normal,
            magnitude: 0.0,
        }
    }

    pub fn is_none_marker(&self) -> bool {
        self.kind == AnomalyKind::Normal
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub risk: RiskSignals,
    pub liquidity: LiquiditySignals,
    pub materials: MaterialsSignals,
    pub crypto_phase: MarketPhase,
    /// Mean 24h change across the assets present, percent
    pub avg_change: f64,
    /// 0..=100
    pub composite_index: u8,
    /// Never empty
    pub anomalies: Vec<Anomaly>,
    pub summary_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Analysis {
        Analysis {
            risk: RiskSignals {
                level: RiskLevel::High,
                volatility: Volatility::High,
                sentiment_label: SentimentLabel::Fear,
            },
            liquidity: LiquiditySignals {
                status: LiquidityStatus::Contracting,
                flow: Flow::Outflow,
            },
            materials: MaterialsSignals {
                gold_trend: GoldTrend::Up,
                inflation_risk: InflationRisk::High,
            },
            crypto_phase: MarketPhase::Capitulation,
            avg_change: -4.0,
            composite_index: 32,
            anomalies: vec![
                Anomaly {
                    asset: "SOL".to_string(),
                    kind: AnomalyKind::Pump,
                    magnitude: 2.0,
                },
                Anomaly {
                    asset: "XRP".to_string(),
                    kind: AnomalyKind::Dump,
                    magnitude: 12.0,
                },
            ],
            summary_text: MarketPhase::Capitulation.summary().to_string(),
        }
    }

    #[test]
    fn test_analysis_wire_format() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["risk"]["level"], json!("HIGH"));
        assert_eq!(value["risk"]["volatility"], json!("HIGH"));
        assert_eq!(value["risk"]["sentimentLabel"], json!("FEAR"));
        assert_eq!(value["liquidity"], json!({ "status": "CONTRACTING", "flow": "OUTFLOW" }));
        assert_eq!(value["materials"], json!({ "goldTrend": "UP", "inflationRisk": "HIGH" }));
        assert_eq!(value["cryptoPhase"], json!("CAPITULATION"));
        assert_eq!(value["avgChange"], json!(-4.0));
        assert_eq!(value["compositeIndex"], json!(32));
        assert_eq!(value["anomalies"][0]["kind"], json!("PUMP"));
        assert_eq!(value["anomalies"][1]["kind"], json!("DUMP"));
        assert_eq!(value["anomalies"][1]["magnitude"], json!(12.0));
        assert!(value["summaryText"].as_str().unwrap().starts_with("HIGH VOLATILITY"));
    }

    #[test]
    fn test_none_marker_wire_format() {
        let value = serde_json::to_value(Anomaly::none_found()).unwrap();
        assert_eq!(value, json!({ "asset": "NONE", "kind": "NORMAL", "magnitude": 0.0 }));
        assert!(Anomaly::none_found().is_none_marker());
    }

    #[test]
    fn test_analysis_round_trips_through_json() {
        let analysis = sample();
        let json = serde_json::to_string(&analysis).unwrap();
        assert_eq!(serde_json::from_str::<Analysis>(&json).unwrap(), analysis);
    }
}
