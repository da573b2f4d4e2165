use tracing::debug;

use crate::core::key_levels::KeyLevelRegistry;
use crate::strategies::Strategy;
use crate::trading::{Trade, TradeLedger};

/// Trades predefined support/resistance levels in their historical direction.
pub struct KeyLevelsStrategy {
    name: String,
    description: String,
    levels: KeyLevelRegistry,
    ledger: TradeLedger,
}

impl KeyLevelsStrategy {
    pub fn new(name: &str, levels: KeyLevelRegistry) -> Self {
        Self {
            name: name.to_string(),
            description: "Trade predefined S/R levels".to_string(),
            levels,
            ledger: TradeLedger::new(),
        }
    }
}

impl Strategy for KeyLevelsStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn should_take_trade(&self, trade: &Trade) -> bool {
        let Some((pair, direction)) = trade.identity() else {
            return false;
        };
        let Some(entry) = trade.entry else {
            return false;
        };
        if !self.levels.contains(pair) {
            return false;
        }

        let hit = self
            .levels
            .near_levels(pair, entry)
            .any(|l| l.direction == direction);
        debug!("[{}] {} {} @ {} -> {}", self.name, pair, direction, entry, hit);
        hit
    }

    fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut TradeLedger {
        &mut self.ledger
    }
}
