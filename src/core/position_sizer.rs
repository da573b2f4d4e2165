use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EngineError, Result};

/// Fraction of the account risked on one trade.
pub const RISK_PER_TRADE: f64 = 0.01;
/// USD value of one pip on a standard lot when the pair is not listed.
pub const DEFAULT_PIP_VALUE: f64 = 10.0;

/// USD value of one pip per standard lot, keyed by instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipValueTable {
    values: HashMap<String, f64>,
}

impl PipValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, pair: &str, value: f64) -> Self {
        self.values.insert(pair.to_string(), value);
        self
    }

    pub fn pip_value(&self, pair: &str) -> f64 {
        self.values.get(pair).copied().unwrap_or(DEFAULT_PIP_VALUE)
    }
}

/// Fixed-fractional lot sizing.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    risk_per_trade: f64,
    pip_values: PipValueTable,
}

impl PositionSizer {
    pub fn new(pip_values: PipValueTable) -> Self {
        Self {
            risk_per_trade: RISK_PER_TRADE,
            pip_values,
        }
    }

    pub fn risk_per_trade(&self) -> f64 {
        self.risk_per_trade
    }

    pub fn pip_value(&self, pair: &str) -> f64 {
        self.pip_values.pip_value(pair)
    }

    /// Lots to trade so that hitting the stop costs `risk_per_trade` of the
    /// balance. Rounded half away from zero to two decimals.
    pub fn size(&self, balance: f64, sl_pips: f64, pair: &str) -> Result<f64> {
        if !sl_pips.is_finite() || sl_pips <= 0.0 {
            return Err(EngineError::InvalidStopLoss { sl_pips });
        }
        if !balance.is_finite() || balance < 0.0 {
            return Err(EngineError::InvalidBalance { balance });
        }

        let risk_amount = balance * self.risk_per_trade;
        let lots = risk_amount / (sl_pips * self.pip_value(pair));
        Ok(round2(lots))
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
