pub mod report;
pub mod runner;
pub mod trade_loader;

pub use report::{BacktestReport, StrategyReport};
pub use runner::{BacktestRunner, Evaluation};
pub use trade_loader::{load_trades, parse_trades, LoadedTrades};
