use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "Buy",
            Direction::Sell => "Sell",
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Direction::Buy),
            "sell" => Ok(Direction::Sell),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Market regime attached to a trade. Parsing is case-insensitive and never
/// fails: anything unrecognised is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketCondition {
    Trending,
    Mixed,
    Choppy,
    #[default]
    Unknown,
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MarketCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCondition::Trending => "trending",
            MarketCondition::Mixed => "mixed",
            MarketCondition::Choppy => "choppy",
            MarketCondition::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "trending" => MarketCondition::Trending,
            "mixed" => MarketCondition::Mixed,
            "choppy" => MarketCondition::Choppy,
            _ => MarketCondition::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MarketCondition::Unknown)
    }
}

/// Outcome of a trade. Starts `Pending` and moves exactly once to a
/// terminal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    #[default]
    Pending,
    Win,
    Loss,
    Breakeven,
}

impl fmt::Display for TradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TradeResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeResult::Pending => "pending",
            TradeResult::Win => "win",
            TradeResult::Loss => "loss",
            TradeResult::Breakeven => "breakeven",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" => TradeResult::Win,
            "loss" => TradeResult::Loss,
            "breakeven" => TradeResult::Breakeven,
            _ => TradeResult::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TradeResult::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

// Lenient serde helpers used by `Trade`. Feed records come from loosely
// typed sources, so a bad label degrades instead of failing the record.

pub(crate) fn lenient_direction<'de, D>(deserializer: D) -> Result<Option<Direction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

pub(crate) fn lenient_condition<'de, D>(deserializer: D) -> Result<MarketCondition, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|s| MarketCondition::parse(&s)).unwrap_or_default())
}

pub(crate) fn lenient_result<'de, D>(deserializer: D) -> Result<TradeResult, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|s| TradeResult::parse(&s)).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_case_insensitive() {
        assert_eq!("buy".parse::<Direction>().unwrap(), Direction::Buy);
        assert_eq!(" SELL ".parse::<Direction>().unwrap(), Direction::Sell);
        assert!("hold".parse::<Direction>().is_err());
    }

    #[test]
    fn condition_defaults_to_unknown() {
        assert_eq!(MarketCondition::parse("Trending"), MarketCondition::Trending);
        assert_eq!(MarketCondition::parse("CHOPPY"), MarketCondition::Choppy);
        assert_eq!(MarketCondition::parse("sideways"), MarketCondition::Unknown);
        assert!(!MarketCondition::Unknown.is_known());
    }

    #[test]
    fn result_lifecycle_flags() {
        assert!(TradeResult::Pending.is_pending());
        assert!(TradeResult::Win.is_terminal());
        assert_eq!(TradeResult::parse("Breakeven"), TradeResult::Breakeven);
        assert_eq!(TradeResult::parse("open"), TradeResult::Pending);
    }
}
