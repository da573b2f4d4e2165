pub mod direction;
pub mod instrument;

pub use direction::{Direction, MarketCondition, TradeResult};
