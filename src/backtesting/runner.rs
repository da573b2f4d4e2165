use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::{Config, MarketTables};
use crate::error::{EngineError, Result};
use crate::models::TradeResult;
use crate::strategies::{default_roster, Strategy};
use crate::trading::Trade;

use super::report::BacktestReport;

/// Which strategies accepted one input trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Position of the trade across every batch this runner has seen.
    pub index: usize,
    pub trade_id: String,
    pub pair: String,
    pub accepted_by: Vec<String>,
}

/// Feeds trades through every strategy. Acceptance decisions are pure, so
/// they can be computed across threads; ledger appends always happen
/// afterwards, one trade at a time, in input order.
pub struct BacktestRunner {
    strategies: Vec<Box<dyn Strategy>>,
    parallel: bool,
    evaluations: Vec<Evaluation>,
    /// Every id handed out so far; settlement addresses trades by id.
    seen_ids: HashSet<String>,
}

impl BacktestRunner {
    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self {
            strategies,
            parallel: true,
            evaluations: Vec::new(),
            seen_ids: HashSet::new(),
        }
    }

    /// The full roster over `tables`, honouring the config's parallel flag.
    pub fn from_config(config: &Config, tables: &MarketTables) -> Self {
        Self::new(default_roster(tables)).with_parallelism(config.parallel_eval)
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn strategies(&self) -> &[Box<dyn Strategy>] {
        &self.strategies
    }

    pub fn strategy(&self, name: &str) -> Option<&dyn Strategy> {
        self.strategies
            .iter()
            .find(|s| s.name() == name)
            .map(|s| &**s)
    }

    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    /// One row per trade, one column per strategy (roster order).
    pub fn decide(&self, trades: &[Trade]) -> Vec<Vec<bool>> {
        let decide_one = |trade: &Trade| -> Vec<bool> {
            self.strategies
                .iter()
                .map(|s| s.should_take_trade(trade))
                .collect()
        };

        if self.parallel {
            trades.par_iter().map(decide_one).collect()
        } else {
            trades.iter().map(decide_one).collect()
        }
    }

    /// Evaluate a batch and append each accepted trade to the ledgers of the
    /// strategies that took it. Returns this batch's evaluations.
    pub fn run(&mut self, trades: &[Trade]) -> Vec<Evaluation> {
        info!(
            "Evaluating {} trades against {} strategies ({})",
            trades.len(),
            self.strategies.len(),
            if self.parallel { "parallel" } else { "serial" }
        );

        let decisions = self.decide(trades);
        let offset = self.evaluations.len();
        let mut batch = Vec::with_capacity(trades.len());

        for (i, (trade, row)) in trades.iter().zip(decisions).enumerate() {
            let mut trade = trade.clone();
            trade.id = self.assign_id(&trade.id, offset + i);

            let mut accepted_by = Vec::new();
            for (strategy, take) in self.strategies.iter_mut().zip(row) {
                if take {
                    accepted_by.push(strategy.name().to_string());
                    strategy.add_trade(trade.clone());
                }
            }
            debug!(
                "#{} {} {:?} accepted by {:?}",
                offset + i,
                trade.pair,
                trade.direction,
                accepted_by
            );
            batch.push(Evaluation {
                index: offset + i,
                trade_id: trade.id.clone(),
                pair: trade.pair.clone(),
                accepted_by,
            });
        }

        let accepted = batch.iter().filter(|e| !e.accepted_by.is_empty()).count();
        info!("Batch done: {}/{} trades taken by at least one strategy", accepted, trades.len());

        self.evaluations.extend(batch.iter().cloned());
        batch
    }

    /// Blank ids become `#<index>`; an id this runner has already handed out
    /// gets `#<index>` appended until it is unique.
    fn assign_id(&mut self, raw: &str, index: usize) -> String {
        let raw = raw.trim();
        let mut id = if raw.is_empty() {
            format!("#{}", index)
        } else {
            raw.to_string()
        };
        if self.seen_ids.contains(&id) && !raw.is_empty() {
            warn!("Duplicate trade id '{}' at #{}; renaming", raw, index);
        }
        while self.seen_ids.contains(&id) {
            id.push_str(&format!("#{}", index));
        }
        self.seen_ids.insert(id.clone());
        id
    }

    /// Apply the feed's outcome for trade `id` to every ledger holding it.
    /// Nothing is changed unless every copy is still pending.
    pub fn settle(&mut self, id: &str, result: TradeResult, pips: f64) -> Result<usize> {
        if result.is_pending() {
            return Err(EngineError::PendingOutcome {
                trade_id: id.to_string(),
            });
        }

        let mut held = false;
        for strategy in &self.strategies {
            for trade in strategy.trades().iter().filter(|t| t.id == id) {
                held = true;
                if trade.is_completed() {
                    return Err(EngineError::OutcomeAlreadySettled {
                        trade_id: id.to_string(),
                        result: trade.result,
                    });
                }
            }
        }
        if !held {
            return Err(EngineError::UnknownTrade {
                trade_id: id.to_string(),
            });
        }

        let mut settled = 0;
        for strategy in self.strategies.iter_mut() {
            settled += strategy.ledger_mut().settle(id, result, pips)?;
        }
        info!("Settled {} as {} ({:+.1} pips) on {} ledger entries", id, result, pips, settled);
        Ok(settled)
    }

    pub fn report(&self) -> BacktestReport {
        BacktestReport::from_runner(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, MarketCondition};
    use crate::strategies::TrendFollowingStrategy;
    use crate::test_helpers::{default_tables, trade_at};

    fn roster_runner(parallel: bool) -> BacktestRunner {
        BacktestRunner::new(default_roster(&default_tables())).with_parallelism(parallel)
    }

    fn sample_batch() -> Vec<Trade> {
        vec![
            trade_at("EURUSD", 1.15980, Direction::Buy, MarketCondition::Unknown).with_id("a"),
            trade_at("XAUUSD", 4200.0, Direction::Sell, MarketCondition::Choppy).with_id("b"),
            trade_at("GBPUSD", 1.25, Direction::Buy, MarketCondition::Trending).with_id("c"),
            Trade::new("EURUSD", None, Direction::Sell).with_id("d"),
        ]
    }

    #[test]
    fn records_acceptances_in_input_order() {
        let mut runner = roster_runner(false);
        let evals = runner.run(&sample_batch());
        let ids: Vec<&str> = evals.iter().map(|e| e.trade_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert!(evals[0].accepted_by.contains(&"Key Levels".to_string()));
        assert_eq!(evals[2].accepted_by, vec!["Trend Following".to_string()]);
        assert!(evals[3].accepted_by.is_empty());
    }

    #[test]
    fn parallel_and_serial_agree() {
        let mut serial = roster_runner(false);
        let mut parallel = roster_runner(true);
        assert_eq!(serial.run(&sample_batch()), parallel.run(&sample_batch()));
        for (a, b) in serial.strategies().iter().zip(parallel.strategies()) {
            assert_eq!(a.trades(), b.trades());
        }
    }

    #[test]
    fn indices_continue_across_batches() {
        let mut runner = roster_runner(false);
        runner.run(&sample_batch());
        let second = runner.run(&sample_batch()[..1]);
        assert_eq!(second[0].index, 4);
        assert_eq!(second[0].trade_id, "a#4");
        assert_eq!(runner.evaluations().len(), 5);
    }

    #[test]
    fn blank_ids_stay_unique_across_batches() {
        let mut runner = BacktestRunner::new(vec![Box::new(TrendFollowingStrategy::new("Trend Following"))])
            .with_parallelism(false);
        let day_one = runner.run(&[trade_at("GBPUSD", 1.25, Direction::Buy, MarketCondition::Trending)]);
        let day_two = runner.run(&[trade_at("EURUSD", 1.16, Direction::Buy, MarketCondition::Trending)]);
        assert_eq!(day_one[0].trade_id, "#0");
        assert_eq!(day_two[0].trade_id, "#1");

        assert_eq!(runner.settle(&day_one[0].trade_id, TradeResult::Win, 30.0).unwrap(), 1);
        assert_eq!(runner.settle(&day_two[0].trade_id, TradeResult::Loss, -10.0).unwrap(), 1);
        let s = runner.strategy("Trend Following").unwrap();
        assert_eq!(s.total_pips(), 20.0);
        assert_eq!((s.wins(), s.losses()), (1, 1));
    }

    #[test]
    fn repeated_ids_are_renamed() {
        let mut runner = BacktestRunner::new(vec![Box::new(TrendFollowingStrategy::new("Trend Following"))]);
        let t = trade_at("GBPUSD", 1.25, Direction::Buy, MarketCondition::Trending);
        let first = runner.run(&[t.clone().with_id("x")]);
        let second = runner.run(&[t.clone().with_id("x"), t.with_id("#2")]);
        assert_eq!(first[0].trade_id, "x");
        assert_eq!(second[0].trade_id, "x#1");
        // explicit id that looks like a generated one is still kept if free
        assert_eq!(second[1].trade_id, "#2");

        runner.settle("x", TradeResult::Win, 15.0).unwrap();
        let s = runner.strategy("Trend Following").unwrap();
        assert_eq!(s.wins(), 1);
        assert_eq!(s.total_pips(), 15.0);
        assert!(runner.settle("x#1", TradeResult::Loss, -5.0).is_ok());
    }

    #[test]
    fn settle_updates_every_holder_once() {
        let mut runner = BacktestRunner::new(vec![
            Box::new(TrendFollowingStrategy::new("A")),
            Box::new(TrendFollowingStrategy::new("B")),
        ]);
        let t = trade_at("GBPUSD", 1.25, Direction::Buy, MarketCondition::Trending).with_id("x");
        runner.run(&[t]);

        assert_eq!(runner.settle("x", TradeResult::Win, 40.0).unwrap(), 2);
        assert_eq!(runner.strategy("A").unwrap().wins(), 1);
        assert_eq!(runner.strategy("B").unwrap().total_pips(), 40.0);

        assert!(matches!(
            runner.settle("x", TradeResult::Loss, -10.0),
            Err(EngineError::OutcomeAlreadySettled { .. })
        ));
        assert!(matches!(
            runner.settle("nope", TradeResult::Win, 1.0),
            Err(EngineError::UnknownTrade { .. })
        ));
        assert!(matches!(
            runner.settle("x", TradeResult::Pending, 0.0),
            Err(EngineError::PendingOutcome { .. })
        ));
    }
}
