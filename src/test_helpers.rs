use crate::config::MarketTables;
use crate::models::{Direction, MarketCondition, TradeResult};
use crate::trading::trade_record::Trade;

/// A settled trade; the result follows the sign of `pips`.
pub fn closed_trade(id: &str, pair: &str, pips: f64) -> Trade {
    let result = if pips > 0.0 {
        TradeResult::Win
    } else if pips < 0.0 {
        TradeResult::Loss
    } else {
        TradeResult::Breakeven
    };
    Trade::new(pair, Some(1.0), Direction::Buy)
        .with_id(id)
        .with_outcome(result, pips)
}

pub fn pending_trade(id: &str, pair: &str) -> Trade {
    Trade::new(pair, Some(1.0), Direction::Buy).with_id(id)
}

/// An unsettled trade at `entry` in the given regime.
pub fn trade_at(pair: &str, entry: f64, direction: Direction, condition: MarketCondition) -> Trade {
    Trade::new(pair, Some(entry), direction).with_condition(condition)
}

pub fn default_tables() -> MarketTables {
    MarketTables::defaults()
}
