use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::trading::Trade;

#[derive(Debug, Clone, Default)]
pub struct LoadedTrades {
    pub trades: Vec<Trade>,
    /// Elements that could not be decoded as a trade at all.
    pub skipped: usize,
}

/// Read a JSON array of trade records from disk.
pub fn load_trades(path: impl AsRef<Path>) -> Result<LoadedTrades> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| EngineError::TradeFile {
        path: source.clone(),
        reason: e.to_string(),
    })?;
    let loaded = parse_trades(&content, &source)?;
    info!(
        "Loaded {} trades from {} ({} skipped)",
        loaded.trades.len(),
        source,
        loaded.skipped
    );
    Ok(loaded)
}

/// Decode each array element on its own; a bad element is logged and
/// skipped. Ids are left as found; the runner assigns missing ones.
pub fn parse_trades(content: &str, source: &str) -> Result<LoadedTrades> {
    let file_error = |reason: String| EngineError::TradeFile {
        path: source.to_string(),
        reason,
    };

    let root: Value = serde_json::from_str(content).map_err(|e| file_error(e.to_string()))?;
    let Value::Array(items) = root else {
        return Err(file_error("expected a JSON array of trades".to_string()));
    };

    let mut loaded = LoadedTrades::default();
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Trade>(item) {
            Ok(trade) => loaded.trades.push(trade),
            Err(e) => {
                warn!("Skipping trade #{} in {}: {}", i, source, e);
                loaded.skipped += 1;
            }
        }
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, MarketCondition, TradeResult};

    #[test]
    fn lenient_fields_and_skips() {
        let json = r#"[
            {"id": "a", "pair": "EURUSD", "entry": 1.1598, "direction": "BUY", "market_condition": "Trending"},
            {"pair": "XAUUSD", "entry": null, "direction": "sideways", "market_condition": "calm", "result": "?"},
            {"pair": 42, "entry": "nope"},
            "not a trade",
            {"pair": "USDJPY", "entry": 156.0, "direction": "sell", "result": "WIN", "pips": 25}
        ]"#;
        let loaded = parse_trades(json, "inline").unwrap();
        assert_eq!(loaded.trades.len(), 3);
        assert_eq!(loaded.skipped, 2);

        let a = &loaded.trades[0];
        assert_eq!(a.id, "a");
        assert_eq!(a.direction, Some(Direction::Buy));
        assert_eq!(a.market_condition, MarketCondition::Trending);

        let b = &loaded.trades[1];
        assert!(b.id.is_empty());
        assert_eq!(b.entry, None);
        assert_eq!(b.direction, None);
        assert_eq!(b.market_condition, MarketCondition::Unknown);
        assert_eq!(b.result, TradeResult::Pending);

        let c = &loaded.trades[2];
        assert!(c.id.is_empty());
        assert_eq!(c.result, TradeResult::Win);
        assert_eq!(c.pips, 25.0);
    }

    #[test]
    fn non_array_is_an_error() {
        assert!(matches!(
            parse_trades(r#"{"pair": "EURUSD"}"#, "inline"),
            Err(EngineError::TradeFile { .. })
        ));
        assert!(parse_trades("not json", "inline").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_trades(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, EngineError::TradeFile { .. }));
    }
}
