use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::instrument::{is_jpy_quoted, is_metal};
use crate::models::Direction;

/// A price with a historical directional bias and its track record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyLevel {
    pub level: f64,
    pub direction: Direction,
    pub confidence: f64,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

impl KeyLevel {
    pub fn new(level: f64, direction: Direction, confidence: f64) -> Self {
        Self {
            level,
            direction,
            confidence,
            wins: 0,
            losses: 0,
        }
    }

    pub fn with_record(mut self, wins: u32, losses: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self
    }

    /// `None` when the level has no recorded trades.
    pub fn win_rate(&self) -> Option<f64> {
        let total = self.wins + self.losses;
        if total == 0 {
            None
        } else {
            Some(self.wins as f64 / total as f64)
        }
    }
}

/// "5 pips" expressed in each quoting convention.
pub fn tolerance(pair: &str) -> f64 {
    if is_metal(pair) {
        5.0
    } else if is_jpy_quoted(pair) {
        0.05
    } else {
        0.0005
    }
}

// Small epsilon so a price sitting exactly on the band edge is not lost
// to float representation (e.g. 1.16030 - 1.15980).
const EDGE_EPSILON: f64 = 1e-9;

pub fn near(pair: &str, price: f64, level: f64) -> bool {
    (price - level).abs() <= tolerance(pair) + EDGE_EPSILON
}

/// Read-only per-instrument level tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyLevelRegistry {
    levels: HashMap<String, Vec<KeyLevel>>,
}

impl KeyLevelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_levels(mut self, pair: &str, levels: Vec<KeyLevel>) -> Self {
        self.levels.insert(pair.to_string(), levels);
        self
    }

    pub fn contains(&self, pair: &str) -> bool {
        self.levels.contains_key(pair)
    }

    pub fn levels_for(&self, pair: &str) -> &[KeyLevel] {
        self.levels.get(pair).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Levels of `pair` within tolerance of `price`, in table order.
    pub fn near_levels<'a>(
        &'a self,
        pair: &'a str,
        price: f64,
    ) -> impl Iterator<Item = &'a KeyLevel> + 'a {
        self.levels_for(pair)
            .iter()
            .filter(move |l| near(pair, price, l.level))
    }

    pub fn level_count(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }
}

/// A band where historical bias is unreliable and either side is tradeable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipZone {
    pub level: f64,
    pub tolerance: f64,
}

impl FlipZone {
    pub fn new(level: f64, tolerance: f64) -> Self {
        Self { level, tolerance }
    }

    pub fn contains(&self, price: f64) -> bool {
        (price - self.level).abs() <= self.tolerance + EDGE_EPSILON
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlipZones {
    zones: HashMap<String, FlipZone>,
}

impl FlipZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, pair: &str, zone: FlipZone) -> Self {
        self.zones.insert(pair.to_string(), zone);
        self
    }

    pub fn get(&self, pair: &str) -> Option<&FlipZone> {
        self.zones.get(pair)
    }

    pub fn contains(&self, pair: &str, price: f64) -> bool {
        self.get(pair).is_some_and(|z| z.contains(price))
    }
}
