use crate::models::TradeResult;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("stop loss must be a positive number of pips, got {sl_pips}")]
    InvalidStopLoss { sl_pips: f64 },

    #[error("account balance must be a non-negative number, got {balance}")]
    InvalidBalance { balance: f64 },

    #[error("trade '{trade_id}' is already settled as {result}")]
    OutcomeAlreadySettled { trade_id: String, result: TradeResult },

    #[error("cannot settle trade '{trade_id}' back to pending")]
    PendingOutcome { trade_id: String },

    #[error("no ledger holds trade '{trade_id}'")]
    UnknownTrade { trade_id: String },

    #[error("failed to load market tables from {path}: {reason}")]
    TableLoad { path: String, reason: String },

    #[error("failed to read trades from {path}: {reason}")]
    TradeFile { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
