//! Trade-selection strategies.
//!
//! Every strategy decides independently whether it would take a trade and
//! keeps its own ledger of the trades it took. The ledger arithmetic lives
//! once in [`TradeLedger`]; the trait's provided methods expose it.

pub mod felix;
pub mod gold_mean_reversion;
pub mod key_levels;
pub mod multi_day_hold;
pub mod trend_following;

pub use felix::FelixStrategy;
pub use gold_mean_reversion::GoldMeanReversionStrategy;
pub use key_levels::KeyLevelsStrategy;
pub use multi_day_hold::MultiDayHoldStrategy;
pub use trend_following::TrendFollowingStrategy;

use std::collections::BTreeMap;

use crate::config::MarketTables;
use crate::trading::{StrategySummary, Trade, TradeLedger};

pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Pure acceptance rule: depends only on the trade and the strategy's
    /// static tables, never on previously accepted trades.
    fn should_take_trade(&self, trade: &Trade) -> bool;

    fn ledger(&self) -> &TradeLedger;
    fn ledger_mut(&mut self) -> &mut TradeLedger;

    /// Stamp the trade with this strategy's name and append it.
    fn add_trade(&mut self, mut trade: Trade) {
        trade.strategy = Some(self.name().to_string());
        self.ledger_mut().push(trade);
    }

    fn trades(&self) -> &[Trade] {
        self.ledger().trades()
    }

    fn total_trades(&self) -> usize {
        self.ledger().total_trades()
    }

    fn wins(&self) -> usize {
        self.ledger().wins()
    }

    fn losses(&self) -> usize {
        self.ledger().losses()
    }

    fn breakevens(&self) -> usize {
        self.ledger().breakevens()
    }

    fn win_rate(&self, exclude_pending: bool) -> f64 {
        self.ledger().win_rate(exclude_pending)
    }

    fn total_pips(&self) -> f64 {
        self.ledger().total_pips()
    }

    fn profit_factor(&self) -> f64 {
        self.ledger().profit_factor()
    }

    fn by_pair(&self) -> BTreeMap<String, Vec<&Trade>> {
        self.ledger().by_pair()
    }

    fn summary(&self) -> StrategySummary {
        self.ledger().summary(self.name(), self.description())
    }
}

/// One instance of every strategy, each holding its own copy of the
/// tables it trades.
pub fn default_roster(tables: &MarketTables) -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(KeyLevelsStrategy::new(
            "Key Levels",
            tables.support_resistance.clone(),
        )),
        Box::new(GoldMeanReversionStrategy::new(
            "Gold Mean Reversion",
            tables.gold_bands.clone(),
        )),
        Box::new(TrendFollowingStrategy::new("Trend Following")),
        Box::new(MultiDayHoldStrategy::new(
            "Multi-Day Hold",
            tables.swing_pairs.clone(),
        )),
        Box::new(FelixStrategy::from_tables("Felix Original Strategy", tables)),
    ]
}
