use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::key_levels::{FlipZone, FlipZones, KeyLevel, KeyLevelRegistry};
use crate::core::position_sizer::PipValueTable;
use crate::core::regime::RegimeTable;
use crate::error::{EngineError, Result};
use crate::models::Direction::{Buy, Sell};
use crate::strategies::gold_mean_reversion::{BandAction, PriceBand};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Run
    pub account_balance: f64,
    pub parallel_eval: bool,

    // Tables
    pub market_tables: Option<String>,

    // Output
    pub report_dir: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            account_balance: env("ACCOUNT_BALANCE", "10000")
                .parse()
                .unwrap_or(10_000.0),
            parallel_eval: env("PARALLEL_EVAL", "true").to_lowercase() == "true",
            market_tables: std::env::var("MARKET_TABLES")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            report_dir: env("REPORT_DIR", "data"),
            log_level: env("LOG_LEVEL", "info"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            account_balance: 10_000.0,
            parallel_eval: true,
            market_tables: None,
            report_dir: "data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Every static per-instrument table the strategies consume. Immutable
/// once loaded; each strategy takes its own copy of what it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketTables {
    /// Plain support/resistance levels traded by the key-levels strategy.
    pub support_resistance: KeyLevelRegistry,
    /// Levels with win/loss records, scored by the composite strategy.
    pub felix_levels: KeyLevelRegistry,
    pub flip_zones: FlipZones,
    pub regimes: RegimeTable,
    pub gold_bands: Vec<PriceBand>,
    pub swing_pairs: Vec<String>,
    pub pip_values: PipValueTable,
}

impl Default for MarketTables {
    fn default() -> Self {
        Self::defaults()
    }
}

impl MarketTables {
    pub fn defaults() -> Self {
        let support_resistance = KeyLevelRegistry::new()
            .with_levels(
                "USDJPY",
                vec![KeyLevel::new(156.025, Sell, 1.0), KeyLevel::new(154.950, Buy, 0.8)],
            )
            .with_levels(
                "EURUSD",
                vec![KeyLevel::new(1.15980, Buy, 1.0), KeyLevel::new(1.17215, Buy, 0.8)],
            )
            .with_levels(
                "XAUUSD",
                vec![
                    KeyLevel::new(4200.0, Buy, 0.8),
                    KeyLevel::new(4221.0, Sell, 0.8),
                    KeyLevel::new(4247.0, Buy, 0.9),
                    KeyLevel::new(4323.0, Buy, 0.9),
                    KeyLevel::new(4405.0, Buy, 0.8),
                ],
            )
            .with_levels(
                "EURAUD",
                vec![KeyLevel::new(1.7745, Sell, 1.0), KeyLevel::new(1.7747, Sell, 1.0)],
            )
            .with_levels("AUDCAD", vec![KeyLevel::new(0.91620, Buy, 1.0)])
            .with_levels("GBPNZD", vec![KeyLevel::new(2.29990, Buy, 1.0)])
            .with_levels("GBPJPY", vec![KeyLevel::new(205.840, Buy, 0.8)])
            .with_levels(
                "USDCHF",
                vec![KeyLevel::new(0.80815, Sell, 1.0), KeyLevel::new(0.79460, Sell, 0.8)],
            );

        let felix_levels = KeyLevelRegistry::new()
            .with_levels(
                "USDJPY",
                vec![
                    KeyLevel::new(156.025, Sell, 1.0).with_record(3, 0),
                    KeyLevel::new(154.950, Buy, 0.8).with_record(1, 0),
                ],
            )
            .with_levels(
                "EURUSD",
                vec![
                    KeyLevel::new(1.15980, Buy, 1.0).with_record(2, 0),
                    KeyLevel::new(1.17215, Buy, 0.8).with_record(2, 0),
                    KeyLevel::new(1.17550, Sell, 0.6).with_record(1, 0),
                ],
            )
            .with_levels(
                "EURAUD",
                vec![
                    KeyLevel::new(1.7745, Sell, 1.0).with_record(6, 0),
                    KeyLevel::new(1.7747, Sell, 1.0).with_record(6, 0),
                    KeyLevel::new(1.76875, Buy, 0.2).with_record(0, 1),
                ],
            )
            .with_levels(
                "XAUUSD",
                vec![
                    KeyLevel::new(4247.0, Buy, 0.9).with_record(3, 0),
                    KeyLevel::new(4192.0, Buy, 0.7).with_record(3, 1),
                    KeyLevel::new(4200.0, Sell, 0.6).with_record(5, 4),
                    KeyLevel::new(4323.0, Buy, 0.9).with_record(3, 0),
                    KeyLevel::new(4405.0, Buy, 0.8).with_record(2, 1),
                ],
            )
            .with_levels("AUDCAD", vec![KeyLevel::new(0.91620, Buy, 1.0).with_record(1, 0)])
            .with_levels("GBPNZD", vec![KeyLevel::new(2.29990, Buy, 1.0).with_record(1, 0)])
            .with_levels("GBPJPY", vec![KeyLevel::new(205.840, Buy, 0.8).with_record(2, 0)])
            .with_levels("EURCAD", vec![KeyLevel::new(1.60765, Buy, 0.8).with_record(2, 0)])
            .with_levels(
                "USDCHF",
                vec![
                    KeyLevel::new(0.80815, Sell, 1.0).with_record(1, 0),
                    KeyLevel::new(0.79460, Sell, 0.8).with_record(3, 0),
                ],
            );

        let flip_zones = FlipZones::new()
            .with_zone("XAUUSD", FlipZone::new(4210.0, 15.0))
            .with_zone("EURUSD", FlipZone::new(1.16500, 0.0020))
            .with_zone("USDJPY", FlipZone::new(156.000, 0.05));

        let gold_bands = vec![
            PriceBand::new(4175.0, 4190.0, BandAction::Buy),
            PriceBand::new(4190.0, 4205.0, BandAction::Buy),
            PriceBand::new(4205.0, 4215.0, BandAction::Both),
            PriceBand::new(4215.0, 4225.0, BandAction::Sell),
            PriceBand::new(4225.0, 4250.0, BandAction::Sell),
            // breakout zone
            PriceBand::new(4250.0, 4350.0, BandAction::Buy),
            // trend continuation
            PriceBand::new(4350.0, 4500.0, BandAction::Buy),
        ];

        let swing_pairs = ["EURAUD", "AUDCAD", "GBPNZD", "GBPJPY", "EURNZD"]
            .iter()
            .map(|p| p.to_string())
            .collect();

        let pip_values = [
            ("EURUSD", 10.0),
            ("GBPUSD", 10.0),
            ("USDJPY", 6.5),
            ("USDCHF", 11.0),
            ("AUDUSD", 10.0),
            ("USDCAD", 7.5),
            ("NZDUSD", 10.0),
            ("XAUUSD", 10.0),
            ("EURJPY", 6.5),
            ("GBPJPY", 6.5),
            ("EURGBP", 13.0),
            ("EURAUD", 6.5),
            ("AUDCAD", 7.5),
            ("AUDJPY", 6.5),
            ("GBPCAD", 7.5),
            ("GBPAUD", 6.5),
            ("GBPNZD", 6.5),
            ("EURCAD", 7.5),
            ("EURCHF", 11.0),
            ("CADJPY", 6.5),
            ("CHFJPY", 6.5),
            ("CADCHF", 11.0),
        ]
        .iter()
        .fold(PipValueTable::new(), |t, &(pair, v)| t.with_value(pair, v));

        MarketTables {
            support_resistance,
            felix_levels,
            flip_zones,
            regimes: RegimeTable::default(),
            gold_bands,
            swing_pairs,
            pip_values,
        }
    }

    /// Read tables from a JSON file. Sections absent from the file keep
    /// their built-in values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let table_err = |reason: String| EngineError::TableLoad {
            path: path.display().to_string(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| table_err(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| table_err(e.to_string()))
    }

    pub fn load(cfg: &Config) -> Result<Self> {
        match &cfg.market_tables {
            Some(path) => Self::from_file(path),
            None => Ok(Self::defaults()),
        }
    }
}
