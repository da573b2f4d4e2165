use crate::models::MarketCondition;
use crate::strategies::Strategy;
use crate::trading::{Trade, TradeLedger};

/// Holds for TP3 in trending markets.
pub struct TrendFollowingStrategy {
    name: String,
    description: String,
    ledger: TradeLedger,
}

impl TrendFollowingStrategy {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: "Hold for TP3 in trending markets".to_string(),
            ledger: TradeLedger::new(),
        }
    }
}

impl Strategy for TrendFollowingStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn should_take_trade(&self, trade: &Trade) -> bool {
        if trade.identity().is_none() {
            return false;
        }
        match trade.market_condition {
            MarketCondition::Trending => true,
            // only with a TP3 to run toward
            MarketCondition::Mixed => trade.tp3.is_some(),
            MarketCondition::Choppy | MarketCondition::Unknown => false,
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
    use crate::models::Direction;
    use crate::test_helpers::trade_at;

    #[test]
    fn trending_takes_everything() {
        let s = TrendFollowingStrategy::new("Trend Following");
        let t = trade_at("GBPUSD", 1.25, Direction::Sell, MarketCondition::Trending);
        assert!(s.should_take_trade(&t));
        let no_entry = Trade::new("GBPUSD", None, Direction::Sell)
            .with_condition(MarketCondition::Trending);
        assert!(s.should_take_trade(&no_entry));
    }

    #[test]
    fn mixed_needs_tp3() {
        let s = TrendFollowingStrategy::new("Trend Following");
        let t = trade_at("GBPUSD", 1.25, Direction::Buy, MarketCondition::Mixed);
        assert!(!s.should_take_trade(&t));
        let t = t.with_targets(Some(1.252), Some(1.255), Some(1.26));
        assert!(s.should_take_trade(&t));
    }

    #[test]
    fn choppy_and_unknown_rejected() {
        let s = TrendFollowingStrategy::new("Trend Following");
        let t = trade_at("GBPUSD", 1.25, Direction::Buy, MarketCondition::Choppy)
            .with_targets(None, None, Some(1.26));
        assert!(!s.should_take_trade(&t));
        let t = trade_at("GBPUSD", 1.25, Direction::Buy, MarketCondition::Unknown);
        assert!(!s.should_take_trade(&t));
    }
}
