use serde::{Deserialize, Serialize};

use crate::models::direction::{lenient_condition, lenient_direction, lenient_result};
use crate::models::{Direction, MarketCondition, TradeResult};

/// A proposed trade as produced by the signal feed.
///
/// The feed owns `result` and `pips`; strategies only read them. The one
/// field the engine writes is `strategy`, stamped on a ledger's own copy
/// when that strategy accepts the trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pair: String,
    #[serde(default)]
    pub entry: Option<f64>,
    #[serde(default, deserialize_with = "lenient_direction")]
    pub direction: Option<Direction>,
    #[serde(default, deserialize_with = "lenient_condition")]
    pub market_condition: MarketCondition,
    #[serde(default)]
    pub tp1: Option<f64>,
    #[serde(default)]
    pub tp2: Option<f64>,
    #[serde(default)]
    pub tp3: Option<f64>,
    #[serde(default, deserialize_with = "lenient_result")]
    pub result: TradeResult,
    #[serde(default)]
    pub pips: f64,
    #[serde(default)]
    pub strategy: Option<String>,
}

impl Trade {
    pub fn new(pair: &str, entry: Option<f64>, direction: Direction) -> Self {
        Self {
            id: String::new(),
            pair: pair.to_string(),
            entry,
            direction: Some(direction),
            market_condition: MarketCondition::Unknown,
            tp1: None,
            tp2: None,
            tp3: None,
            result: TradeResult::Pending,
            pips: 0.0,
            strategy: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_condition(mut self, condition: MarketCondition) -> Self {
        self.market_condition = condition;
        self
    }

    pub fn with_targets(mut self, tp1: Option<f64>, tp2: Option<f64>, tp3: Option<f64>) -> Self {
        self.tp1 = tp1;
        self.tp2 = tp2;
        self.tp3 = tp3;
        self
    }

    pub fn with_outcome(mut self, result: TradeResult, pips: f64) -> Self {
        self.result = result;
        self.pips = pips;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.result.is_terminal()
    }

    /// Pair and side, if both are usable. Every strategy rejects a trade
    /// for which this is `None`.
    pub fn identity(&self) -> Option<(&str, Direction)> {
        let pair = self.pair.trim();
        if pair.is_empty() {
            return None;
        }
        self.direction.map(|d| (pair, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_with_defaults() {
        let t: Trade = serde_json::from_str(r#"{"pair":"EURUSD","entry":1.1598,"direction":"Buy"}"#)
            .unwrap();
        assert_eq!(t.direction, Some(Direction::Buy));
        assert_eq!(t.market_condition, MarketCondition::Unknown);
        assert_eq!(t.result, TradeResult::Pending);
        assert!(t.tp3.is_none());
        assert!(t.strategy.is_none());
    }

    #[test]
    fn decodes_labels_leniently() {
        let t: Trade = serde_json::from_str(
            r#"{"pair":"XAUUSD","entry":null,"direction":"long","market_condition":"TRENDING","result":"WIN","pips":42.5}"#,
        )
        .unwrap();
        assert!(t.entry.is_none());
        assert!(t.direction.is_none());
        assert_eq!(t.market_condition, MarketCondition::Trending);
        assert_eq!(t.result, TradeResult::Win);
        assert!(t.identity().is_none());
    }

    #[test]
    fn identity_requires_pair() {
        let t = Trade::new("  ", Some(1.0), Direction::Sell);
        assert!(t.identity().is_none());
        let t = Trade::new("USDJPY", Some(156.0), Direction::Sell);
        assert_eq!(t.identity(), Some(("USDJPY", Direction::Sell)));
    }
}
