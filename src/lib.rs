pub mod backtesting;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod strategies;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;
