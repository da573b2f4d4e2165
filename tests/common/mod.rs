#![allow(dead_code)]

use felix_strategies::models::{Direction, MarketCondition, TradeResult};
use felix_strategies::trading::Trade;

/// A pending trade as the feed would emit it.
pub fn feed_trade(id: &str, pair: &str, entry: f64, direction: Direction, condition: &str) -> Trade {
    Trade::new(pair, Some(entry), direction)
        .with_id(id)
        .with_condition(MarketCondition::parse(condition))
}

/// A settled trade; the result follows the sign of `pips`.
pub fn closed(id: &str, pair: &str, pips: f64) -> Trade {
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

/// A mixed batch touching every strategy's acceptance rule.
pub fn sample_feed() -> Vec<Trade> {
    vec![
        feed_trade("eu-1", "EURUSD", 1.15980, Direction::Buy, "unknown"),
        feed_trade("eu-2", "EURUSD", 1.15980, Direction::Sell, "unknown"),
        feed_trade("xau-1", "XAUUSD", 4200.0, Direction::Sell, "choppy"),
        feed_trade("xau-2", "XAUUSD", 4180.0, Direction::Buy, "Trending"),
        feed_trade("ea-1", "EURAUD", 1.7745, Direction::Sell, "TRENDING"),
        feed_trade("gu-1", "GBPUSD", 1.2500, Direction::Buy, "mixed")
            .with_targets(Some(1.2520), Some(1.2550), Some(1.2600)),
        feed_trade("uj-1", "USDJPY", 156.025, Direction::Sell, "choppy"),
        Trade::new("EURUSD", None, Direction::Buy).with_id("no-entry"),
    ]
}
