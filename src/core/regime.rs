use serde::{Deserialize, Serialize};

use crate::models::MarketCondition;

/// Expected win rate when the regime is unknown.
pub const NEUTRAL_WIN_RATE: f64 = 0.50;

/// Empirically tuned scale applied to a regime's TP3 hit rate when it
/// adjusts confidence. Kept as found; it is not derived from the data.
pub const TP3_CONFIDENCE_SCALE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeProfile {
    /// How often the regime historically reaches the deepest TP tier.
    pub tp3_rate: f64,
    pub expected_win_rate: f64,
    /// Multiplier on the base stop loss.
    pub sl_adjustment: f64,
}

/// Per-regime multipliers for the three known market conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeTable {
    pub trending: RegimeProfile,
    pub mixed: RegimeProfile,
    pub choppy: RegimeProfile,
}

impl Default for RegimeTable {
    fn default() -> Self {
        Self {
            trending: RegimeProfile {
                tp3_rate: 0.75,
                expected_win_rate: 0.75,
                sl_adjustment: 1.0,
            },
            mixed: RegimeProfile {
                tp3_rate: 0.40,
                expected_win_rate: 0.40,
                sl_adjustment: 0.875,
            },
            choppy: RegimeProfile {
                tp3_rate: 0.15,
                expected_win_rate: 0.15,
                sl_adjustment: 0.75,
            },
        }
    }
}

impl RegimeTable {
    pub fn profile(&self, condition: MarketCondition) -> Option<&RegimeProfile> {
        match condition {
            MarketCondition::Trending => Some(&self.trending),
            MarketCondition::Mixed => Some(&self.mixed),
            MarketCondition::Choppy => Some(&self.choppy),
            MarketCondition::Unknown => None,
        }
    }

    /// Factor applied to a confidence score; 1.0 for an unknown regime.
    pub fn confidence_multiplier(&self, condition: MarketCondition) -> f64 {
        self.profile(condition)
            .map_or(1.0, |p| p.tp3_rate * TP3_CONFIDENCE_SCALE)
    }

    pub fn win_rate_expectation(&self, condition: MarketCondition) -> f64 {
        self.profile(condition)
            .map_or(NEUTRAL_WIN_RATE, |p| p.expected_win_rate)
    }

    pub fn sl_adjustment(&self, condition: MarketCondition) -> f64 {
        self.profile(condition).map_or(1.0, |p| p.sl_adjustment)
    }
}
