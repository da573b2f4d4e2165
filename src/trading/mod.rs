pub mod ledger;
pub mod trade_analyzer;
pub mod trade_record;

pub use ledger::{StrategySummary, TradeLedger};
pub use trade_analyzer::PairStats;
pub use trade_record::Trade;
