use serde::{Deserialize, Serialize};

use crate::models::TradeResult;
use crate::trading::ledger::TradeLedger;
use crate::trading::trade_record::Trade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    pub pair: String,
    pub trades: usize,
    pub completed: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub win_rate: f64,
    pub total_pips: f64,
}

/// Per-pair breakdown of a ledger, ordered by pair symbol.
pub fn pair_breakdown(ledger: &TradeLedger) -> Vec<PairStats> {
    ledger
        .by_pair()
        .into_iter()
        .map(|(pair, trades)| compute_stats(&pair, &trades))
        .collect()
}

fn compute_stats(pair: &str, trades: &[&Trade]) -> PairStats {
    let count = |r: TradeResult| trades.iter().filter(|t| t.result == r).count();

    let wins = count(TradeResult::Win);
    let losses = count(TradeResult::Loss);
    let breakevens = count(TradeResult::Breakeven);
    let completed = wins + losses + breakevens;

    let win_rate = if completed > 0 {
        wins as f64 / completed as f64 * 100.0
    } else {
        0.0
    };

    let total_pips: f64 = trades
        .iter()
        .filter(|t| t.is_completed())
        .map(|t| t.pips)
        .sum();

    PairStats {
        pair: pair.to_string(),
        trades: trades.len(),
        completed,
        wins,
        losses,
        breakevens,
        win_rate: round2(win_rate),
        total_pips: round2(total_pips),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
