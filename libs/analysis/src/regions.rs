//! Regional trading sessions
//!
//! Schedule only: which regions are open is a table lookup on the UTC hour,
//! and each region's trend/description is a fixed annotation that never
//! looks at market data. Windows are `[open, close)` in UTC hours.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionTrend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStatus {
    pub name: String,
    pub is_open: bool,
    pub trend: RegionTrend,
    pub description: String,
}

struct SessionWindow {
    name: &'static str,
    open: u32,
    close: u32,
    trend: RegionTrend,
    description: &'static str,
}

impl SessionWindow {
    fn contains(&self, hour: u32) -> bool {
        (self.open..self.close).contains(&hour)
    }
}

const REGIONS: [SessionWindow; 3] = [
    SessionWindow {
        name: "USA",
        open: 13,
        close: 22,
        trend: RegionTrend::Up,
        description: "PRE-MARKET POSITIVE",
    },
    SessionWindow {
        name: "EUROPE",
        open: 8,
        close: 16,
        trend: RegionTrend::Down,
        description: "MIXED / DAX WEAK",
    },
    SessionWindow {
        name: "ASIA",
        open: 0,
        close: 9,
        trend: RegionTrend::Neutral,
        description: "CONSOLIDATION",
    },
];

/// Status of every region at the given UTC hour
pub fn regional_status(hour: u32) -> Vec<RegionStatus> {
    REGIONS
        .iter()
        .map(|window| RegionStatus {
            name: window.name.to_string(),
            is_open: window.contains(hour),
            trend: window.trend,
            description: window.description.to_string(),
        })
        .collect()
}

pub fn regional_status_at(now: DateTime<Utc>) -> Vec<RegionStatus> {
    regional_status(now.hour())
}

/// Headline session label for the clock display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradingSession {
    Asia,
    Europe,
    Usa,
    GlobalClose,
}

impl TradingSession {
    pub fn label(&self) -> &'static str {
        match self {
            TradingSession::Asia => "ASIA (TOKYO)",
            TradingSession::Europe => "EUROPE (LONDON)",
            TradingSession::Usa => "USA (NY)",
            TradingSession::GlobalClose => "GLOBAL / CLOSE",
        }
    }
}

/// Single dominant session for the hour
///
/// Unlike the region table, sessions hand over at fixed hours and never
/// overlap.
pub fn current_session(hour: u32) -> TradingSession {
    match hour {
        0..=7 | 23..=u32::MAX => TradingSession::Asia,
        8..=12 => TradingSession::Europe,
        13..=21 => TradingSession::Usa,
        _ => TradingSession::GlobalClose,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn open_regions(hour: u32) -> Vec<String> {
        regional_status(hour)
            .into_iter()
            .filter(|r| r.is_open)
            .map(|r| r.name)
            .collect()
    }

    #[test]
    fn test_hour_fourteen() {
        let regions = regional_status(14);

        assert_eq!(regions.len(), 3);
        assert!(regions[0].is_open, "USA");
        assert!(regions[1].is_open, "EUROPE");
        assert!(!regions[2].is_open, "ASIA");
    }

    #[test]
    fn test_window_boundaries() {
        assert_eq!(open_regions(0), vec!["ASIA"]);
        assert_eq!(open_regions(8), vec!["EUROPE", "ASIA"]);
        assert_eq!(open_regions(9), vec!["EUROPE"]);
        assert_eq!(open_regions(13), vec!["USA", "EUROPE"]);
        assert_eq!(open_regions(16), vec!["USA"]);
        assert_eq!(open_regions(22), Vec::<String>::new());
        assert_eq!(open_regions(23), Vec::<String>::new());
    }

    #[test]
    fn test_annotations_are_static() {
        let morning = regional_status(3);
        let evening = regional_status(20);

        for (a, b) in morning.iter().zip(&evening) {
            assert_eq!(a.trend, b.trend);
            assert_eq!(a.description, b.description);
        }
        assert_eq!(morning[0].trend, RegionTrend::Up);
        assert_eq!(morning[1].description, "MIXED / DAX WEAK");
        assert_eq!(morning[2].trend, RegionTrend::Neutral);
    }

    #[test]
    fn test_status_from_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 14, 30, 0).unwrap();
        assert_eq!(regional_status_at(now), regional_status(14));
    }

    #[test]
    fn test_current_session() {
        assert_eq!(current_session(23), TradingSession::Asia);
        assert_eq!(current_session(7), TradingSession::Asia);
        assert_eq!(current_session(8), TradingSession::Europe);
        assert_eq!(current_session(13).label(), "USA (NY)");
        assert_eq!(current_session(22), TradingSession::GlobalClose);
    }
}
