use tracing::trace;

use crate::core::key_levels::{FlipZones, KeyLevelRegistry};
use crate::core::regime::RegimeTable;
use crate::models::{Direction, MarketCondition};

const BASE_CONFIDENCE: f64 = 0.5;
/// Floor when the entry sits on a level but trades against its bias.
const CONTRARIAN_FLOOR: f64 = 0.3;
const FLIP_ZONE_FLOOR: f64 = 0.7;

/// Minimum score the composite strategy needs to take a trade.
pub const ACCEPT_THRESHOLD: f64 = 0.6;

/// Scores a prospective entry against historical levels, the market regime
/// and known flip zones. Output is always within [0, 1].
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    levels: KeyLevelRegistry,
    flip_zones: FlipZones,
    regimes: RegimeTable,
}

impl ConfidenceScorer {
    pub fn new(levels: KeyLevelRegistry, flip_zones: FlipZones, regimes: RegimeTable) -> Self {
        Self {
            levels,
            flip_zones,
            regimes,
        }
    }

    pub fn levels(&self) -> &KeyLevelRegistry {
        &self.levels
    }

    pub fn regimes(&self) -> &RegimeTable {
        &self.regimes
    }

    pub fn score(
        &self,
        pair: &str,
        entry: f64,
        direction: Direction,
        condition: MarketCondition,
    ) -> f64 {
        let mut confidence = BASE_CONFIDENCE;

        for level in self.levels.near_levels(pair, entry) {
            if level.direction == direction {
                let Some(win_rate) = level.win_rate() else {
                    continue;
                };
                confidence = confidence.max(level.confidence * win_rate);
            } else {
                confidence = confidence.max(CONTRARIAN_FLOOR);
            }
        }

        if condition.is_known() {
            confidence *= self.regimes.confidence_multiplier(condition);
        }

        if self.flip_zones.contains(pair, entry) {
            confidence = confidence.max(FLIP_ZONE_FLOOR);
        }

        let confidence = confidence.clamp(0.0, 1.0);
        trace!(
            "[SCORE] {} {} @ {} ({}) -> {:.4}",
            pair,
            direction,
            entry,
            condition,
            confidence
        );
        confidence
    }

    /// True when `entry` is on a level whose recorded bias opposes `direction`.
    pub fn opposes_level(&self, pair: &str, entry: f64, direction: Direction) -> bool {
        self.levels
            .near_levels(pair, entry)
            .any(|l| l.direction != direction)
    }
}
