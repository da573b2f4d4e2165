use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EngineError, Result};
use crate::models::TradeResult;
use crate::trading::trade_record::Trade;

/// Serializable performance summary of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub name: String,
    pub description: String,
    pub total_trades: usize,
    pub completed_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub win_rate: f64,
    pub total_pips: f64,
    pub profit_factor: f64,
}

/// Append-only list of trades accepted by one strategy, plus the
/// performance arithmetic every strategy shares.
///
/// Pip aggregates only look at completed trades: a pending trade's `pips`
/// carries no meaning yet.
#[derive(Debug, Clone, Default)]
pub struct TradeLedger {
    trades: Vec<Trade>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    fn completed(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.is_completed())
    }

    fn count_result(&self, result: TradeResult) -> usize {
        self.trades.iter().filter(|t| t.result == result).count()
    }

    pub fn total_trades(&self) -> usize {
        self.trades.len()
    }

    pub fn completed_trades(&self) -> usize {
        self.completed().count()
    }

    pub fn wins(&self) -> usize {
        self.count_result(TradeResult::Win)
    }

    pub fn losses(&self) -> usize {
        self.count_result(TradeResult::Loss)
    }

    pub fn breakevens(&self) -> usize {
        self.count_result(TradeResult::Breakeven)
    }

    /// Percentage of winners, 0.0 when nothing qualifies.
    pub fn win_rate(&self, exclude_pending: bool) -> f64 {
        let count = if exclude_pending {
            self.completed_trades()
        } else {
            self.total_trades()
        };
        if count == 0 {
            return 0.0;
        }
        self.wins() as f64 / count as f64 * 100.0
    }

    pub fn total_pips(&self) -> f64 {
        self.completed().map(|t| t.pips).sum()
    }

    /// Gross profit over gross loss. With no losers this is the gross
    /// profit itself, or 1.0 when there is no profit either.
    pub fn profit_factor(&self) -> f64 {
        let gross_profit: f64 = self
            .completed()
            .filter(|t| t.pips > 0.0)
            .map(|t| t.pips)
            .sum();
        let gross_loss: f64 = self
            .completed()
            .filter(|t| t.pips < 0.0)
            .map(|t| t.pips)
            .sum::<f64>()
            .abs();

        if gross_loss == 0.0 {
            return if gross_profit > 0.0 { gross_profit } else { 1.0 };
        }
        gross_profit / gross_loss
    }

    /// Trades grouped by pair, keeping ledger order inside each group.
    pub fn by_pair(&self) -> BTreeMap<String, Vec<&Trade>> {
        let mut groups: BTreeMap<String, Vec<&Trade>> = BTreeMap::new();
        for trade in &self.trades {
            groups.entry(trade.pair.clone()).or_default().push(trade);
        }
        groups
    }

    /// Record the feed's outcome for every copy of trade `id` held here.
    /// Returns how many entries were settled; zero if the id is absent.
    pub fn settle(&mut self, id: &str, result: TradeResult, pips: f64) -> Result<usize> {
        if result.is_pending() {
            return Err(EngineError::PendingOutcome {
                trade_id: id.to_string(),
            });
        }

        if let Some(done) = self.trades.iter().find(|t| t.id == id && t.is_completed()) {
            return Err(EngineError::OutcomeAlreadySettled {
                trade_id: id.to_string(),
                result: done.result,
            });
        }

        let mut settled = 0;
        for trade in self.trades.iter_mut().filter(|t| t.id == id) {
            trade.result = result;
            trade.pips = pips;
            settled += 1;
        }
        Ok(settled)
    }

    pub fn summary(&self, name: &str, description: &str) -> StrategySummary {
        StrategySummary {
            name: name.to_string(),
            description: description.to_string(),
            total_trades: self.total_trades(),
            completed_trades: self.completed_trades(),
            wins: self.wins(),
            losses: self.losses(),
            breakevens: self.breakevens(),
            win_rate: round2(self.win_rate(true)),
            total_pips: round2(self.total_pips()),
            profit_factor: round2(self.profit_factor()),
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
