//! Composite strategy: confidence scoring over scored key levels, regime
//! multipliers and flip zones, plus the stop/target playbook that goes
//! with it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MarketTables;
use crate::core::confidence::{ConfidenceScorer, ACCEPT_THRESHOLD};
use crate::core::position_sizer::PositionSizer;
use crate::core::regime::RegimeTable;
use crate::error::Result;
use crate::models::{Direction, MarketCondition};
use crate::strategies::Strategy;
use crate::trading::{Trade, TradeLedger};

const DEFAULT_SL_PIPS: u32 = 80;
const TIGHT_SL_PIPS: u32 = 60;
const MANUAL_CUT_PIPS: u32 = 20;

const TP1_RANGE: (u32, u32) = (15, 30);
const TP2_RANGE: (u32, u32) = (30, 80);
const TP3_RANGE: (u32, u32) = (100, 180);

/// Profit already banked before a runner is held for TP3.
const TRENDING_HOLD_PIPS: f64 = 50.0;
const MIXED_HOLD_PIPS: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpTargets {
    pub tp1: u32,
    pub tp2: u32,
    pub tp3: u32,
}

/// Serializable description of how the composite strategy is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FelixProfile {
    pub name: String,
    pub risk_per_trade: f64,
    pub default_sl_pips: u32,
    pub tight_sl_pips: u32,
    pub manual_cut_pips: u32,
    pub tp1_range: (u32, u32),
    pub tp2_range: (u32, u32),
    pub tp3_range: (u32, u32),
    pub key_levels_count: usize,
    pub market_multipliers: RegimeTable,
}

pub struct FelixStrategy {
    name: String,
    description: String,
    scorer: ConfidenceScorer,
    sizer: PositionSizer,
    ledger: TradeLedger,
}

impl FelixStrategy {
    pub fn new(name: &str, scorer: ConfidenceScorer, sizer: PositionSizer) -> Self {
        Self {
            name: name.to_string(),
            description: "Dynamic SL, TP scaling, and market condition detection".to_string(),
            scorer,
            sizer,
            ledger: TradeLedger::new(),
        }
    }

    pub fn from_tables(name: &str, tables: &MarketTables) -> Self {
        let scorer = ConfidenceScorer::new(
            tables.felix_levels.clone(),
            tables.flip_zones.clone(),
            tables.regimes,
        );
        let sizer = PositionSizer::new(tables.pip_values.clone());
        Self::new(name, scorer, sizer)
    }

    /// Confidence for a trade, or `None` if it cannot be scored.
    pub fn confidence(&self, trade: &Trade) -> Option<f64> {
        let (pair, direction) = trade.identity()?;
        let entry = trade.entry?;
        Some(
            self.scorer
                .score(pair, entry, direction, trade.market_condition),
        )
    }

    pub fn get_sl_for_market_condition(&self, condition: MarketCondition) -> u32 {
        let adjustment = self.scorer.regimes().sl_adjustment(condition);
        (DEFAULT_SL_PIPS as f64 * adjustment) as u32
    }

    pub fn get_tp_targets(&self, condition: MarketCondition) -> TpTargets {
        match condition {
            MarketCondition::Trending => TpTargets {
                tp1: 30,
                tp2: 80,
                tp3: 180,
            },
            MarketCondition::Mixed => TpTargets {
                tp1: 20,
                tp2: 50,
                tp3: 100,
            },
            // choppy, and anything we cannot classify
            MarketCondition::Choppy | MarketCondition::Unknown => TpTargets {
                tp1: 15,
                tp2: 30,
                tp3: 60,
            },
        }
    }

    pub fn should_hold_for_tp3(&self, condition: MarketCondition, current_pips: f64) -> bool {
        match condition {
            MarketCondition::Trending => current_pips >= TRENDING_HOLD_PIPS,
            MarketCondition::Mixed => current_pips >= MIXED_HOLD_PIPS,
            MarketCondition::Choppy | MarketCondition::Unknown => false,
        }
    }

    /// True when the entry sits on a level whose recorded direction differs
    /// from `direction`, i.e. a potential reversal against the bias.
    pub fn should_flip_direction(&self, pair: &str, entry: f64, direction: Direction) -> bool {
        self.scorer.opposes_level(pair, entry, direction)
    }

    pub fn win_rate_expectation(&self, condition: MarketCondition) -> f64 {
        self.scorer.regimes().win_rate_expectation(condition)
    }

    pub fn calculate_position_size(&self, balance: f64, sl_pips: f64, pair: &str) -> Result<f64> {
        self.sizer.size(balance, sl_pips, pair)
    }

    pub fn profile(&self) -> FelixProfile {
        FelixProfile {
            name: self.name.clone(),
            risk_per_trade: self.sizer.risk_per_trade(),
            default_sl_pips: DEFAULT_SL_PIPS,
            tight_sl_pips: TIGHT_SL_PIPS,
            manual_cut_pips: MANUAL_CUT_PIPS,
            tp1_range: TP1_RANGE,
            tp2_range: TP2_RANGE,
            tp3_range: TP3_RANGE,
            key_levels_count: self.scorer.levels().level_count(),
            market_multipliers: *self.scorer.regimes(),
        }
    }
}

impl Strategy for FelixStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn should_take_trade(&self, trade: &Trade) -> bool {
        match self.confidence(trade) {
            Some(confidence) => {
                debug!(
                    "[{}] {} confidence {:.4} (threshold {})",
                    self.name, trade.pair, confidence, ACCEPT_THRESHOLD
                );
                confidence >= ACCEPT_THRESHOLD
            }
            None => false,
        }
    }

    fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut TradeLedger {
        &mut self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::key_levels::FlipZones;
    use crate::test_helpers::{default_tables, trade_at};

    fn felix() -> FelixStrategy {
        FelixStrategy::from_tables("Felix Original Strategy", &default_tables())
    }

    fn felix_without_flip_zones() -> FelixStrategy {
        let tables = MarketTables {
            flip_zones: FlipZones::new(),
            ..default_tables()
        };
        FelixStrategy::from_tables("Felix Original Strategy", &tables)
    }

    #[test]
    fn gold_sell_in_choppy_market_below_threshold() {
        let t = trade_at("XAUUSD", 4200.0, Direction::Sell, MarketCondition::Choppy);
        let s = felix_without_flip_zones();
        let c = s.confidence(&t).unwrap();
        assert!((c - 0.1125).abs() < 1e-9);
        assert!(!s.should_take_trade(&t));
    }

    #[test]
    fn gold_flip_band_makes_trade_acceptable() {
        let t = trade_at("XAUUSD", 4200.0, Direction::Sell, MarketCondition::Choppy);
        assert!(felix().should_take_trade(&t));
    }

    #[test]
    fn strong_level_in_trend_is_taken() {
        // EURAUD 1.7745 Sell, 6-0 record
        let t = trade_at("EURAUD", 1.7745, Direction::Sell, MarketCondition::Trending);
        assert!(felix().should_take_trade(&t));
    }

    #[test]
    fn base_score_is_not_enough() {
        let t = trade_at("EURUSD", 1.20000, Direction::Buy, MarketCondition::Unknown);
        assert!(!felix().should_take_trade(&t));
    }

    #[test]
    fn missing_entry_is_not_scored() {
        let t = Trade::new("EURUSD", None, Direction::Buy);
        assert!(felix().confidence(&t).is_none());
        assert!(!felix().should_take_trade(&t));
    }

    #[test]
    fn stop_loss_by_regime() {
        let s = felix();
        assert_eq!(s.get_sl_for_market_condition(MarketCondition::Trending), 80);
        assert_eq!(s.get_sl_for_market_condition(MarketCondition::Mixed), 70);
        assert_eq!(s.get_sl_for_market_condition(MarketCondition::Choppy), 60);
        assert_eq!(s.get_sl_for_market_condition(MarketCondition::Unknown), 80);
    }

    #[test]
    fn tp_targets_by_regime() {
        let s = felix();
        assert_eq!(
            s.get_tp_targets(MarketCondition::Trending),
            TpTargets { tp1: 30, tp2: 80, tp3: 180 }
        );
        assert_eq!(
            s.get_tp_targets(MarketCondition::Mixed),
            TpTargets { tp1: 20, tp2: 50, tp3: 100 }
        );
        assert_eq!(
            s.get_tp_targets(MarketCondition::Choppy),
            TpTargets { tp1: 15, tp2: 30, tp3: 60 }
        );
        assert_eq!(
            s.get_tp_targets(MarketCondition::Unknown),
            s.get_tp_targets(MarketCondition::Choppy)
        );
    }

    #[test]
    fn hold_for_tp3_thresholds() {
        let s = felix();
        assert!(s.should_hold_for_tp3(MarketCondition::Trending, 50.0));
        assert!(!s.should_hold_for_tp3(MarketCondition::Trending, 49.9));
        assert!(!s.should_hold_for_tp3(MarketCondition::Mixed, 60.0));
        assert!(s.should_hold_for_tp3(MarketCondition::Mixed, 70.0));
        assert!(!s.should_hold_for_tp3(MarketCondition::Choppy, 500.0));
    }

    #[test]
    fn flip_signal_against_recorded_bias() {
        let s = felix();
        assert!(s.should_flip_direction("USDJPY", 156.025, Direction::Buy));
        assert!(!s.should_flip_direction("USDJPY", 156.025, Direction::Sell));
        assert!(!s.should_flip_direction("USDJPY", 150.0, Direction::Buy));
        assert!(!s.should_flip_direction("NZDCAD", 0.8, Direction::Buy));
    }

    #[test]
    fn position_size_uses_one_percent_risk() {
        let s = felix();
        assert_eq!(s.calculate_position_size(10_000.0, 80.0, "EURUSD").unwrap(), 0.13);
        assert!(s.calculate_position_size(10_000.0, 0.0, "EURUSD").is_err());
    }

    #[test]
    fn expectation_and_profile() {
        let s = felix();
        assert_eq!(s.win_rate_expectation(MarketCondition::Mixed), 0.40);
        assert_eq!(s.win_rate_expectation(MarketCondition::Unknown), 0.50);

        let p = s.profile();
        assert_eq!(p.risk_per_trade, 0.01);
        assert_eq!(p.default_sl_pips, 80);
        assert_eq!(p.tp3_range, (100, 180));
        assert_eq!(p.key_levels_count, 19);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["market_multipliers"]["choppy"]["tp3_rate"], 0.15);
    }
}
