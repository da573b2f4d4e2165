use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::instrument::METAL;
use crate::models::Direction;
use crate::strategies::Strategy;
use crate::trading::{Trade, TradeLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandAction {
    Buy,
    Sell,
    Both,
}

impl BandAction {
    pub fn allows(self, direction: Direction) -> bool {
        match self {
            BandAction::Both => true,
            BandAction::Buy => direction == Direction::Buy,
            BandAction::Sell => direction == Direction::Sell,
        }
    }
}

/// Inclusive price range with the side(s) worth trading inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
    pub action: BandAction,
}

impl PriceBand {
    pub fn new(low: f64, high: f64, action: BandAction) -> Self {
        Self { low, high, action }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }
}

/// Buys dips and sells rips on gold using fixed price bands.
pub struct GoldMeanReversionStrategy {
    name: String,
    description: String,
    bands: Vec<PriceBand>,
    ledger: TradeLedger,
}

impl GoldMeanReversionStrategy {
    pub fn new(name: &str, bands: Vec<PriceBand>) -> Self {
        Self {
            name: name.to_string(),
            description: "Buy dips/sell rips on XAUUSD".to_string(),
            bands,
            ledger: TradeLedger::new(),
        }
    }

    /// First configured band containing `price`. Shared edges resolve to
    /// the earlier band.
    pub fn band_for(&self, price: f64) -> Option<&PriceBand> {
        self.bands.iter().find(|b| b.contains(price))
    }
}

impl Strategy for GoldMeanReversionStrategy {
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
        if pair != METAL {
            return false;
        }
        let Some(entry) = trade.entry else {
            return false;
        };

        let take = self
            .band_for(entry)
            .is_some_and(|band| band.action.allows(direction));
        debug!("[{}] {} {} @ {} -> {}", self.name, pair, direction, entry, take);
        take
    }

    fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut TradeLedger {
        &mut self.ledger
    }
}
