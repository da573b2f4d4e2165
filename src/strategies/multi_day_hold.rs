use tracing::debug;

use crate::models::instrument::pip_distance;
use crate::strategies::Strategy;
use crate::trading::{Trade, TradeLedger};

/// Minimum entry-to-TP3 distance, in pips, for a swing candidate.
const MIN_SWING_PIPS: f64 = 80.0;

/// 1-3 day swing trades.
pub struct MultiDayHoldStrategy {
    name: String,
    description: String,
    swing_pairs: Vec<String>,
    ledger: TradeLedger,
}

impl MultiDayHoldStrategy {
    pub fn new(name: &str, swing_pairs: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            description: "1-3 day swing trades".to_string(),
            swing_pairs,
            ledger: TradeLedger::new(),
        }
    }

    pub fn is_swing_pair(&self, pair: &str) -> bool {
        self.swing_pairs.iter().any(|p| p == pair)
    }
}

impl Strategy for MultiDayHoldStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn should_take_trade(&self, trade: &Trade) -> bool {
        let Some((pair, _)) = trade.identity() else {
            return false;
        };
        if self.is_swing_pair(pair) {
            return true;
        }

        match (trade.entry, trade.tp3) {
            (Some(entry), Some(tp3)) => {
                let pips = pip_distance(pair, tp3, entry);
                debug!("[{}] {} TP3 distance {:.1} pips", self.name, pair, pips);
                pips >= MIN_SWING_PIPS
            }
            _ => false,
        }
    }

    fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut TradeLedger {
        &mut self.ledger
    }
}
