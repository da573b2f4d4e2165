use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::trading::trade_analyzer::pair_breakdown;
use crate::trading::{PairStats, StrategySummary};

use super::runner::{BacktestRunner, Evaluation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    pub summary: StrategySummary,
    pub pairs: Vec<PairStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub generated_at: DateTime<Utc>,

    // Input
    pub trades_evaluated: usize,
    pub trades_accepted: usize,
    pub trades_rejected_by_all: usize,

    // Per strategy, roster order
    pub strategies: Vec<StrategyReport>,

    pub evaluations: Vec<Evaluation>,
}

impl BacktestReport {
    pub fn from_runner(runner: &BacktestRunner) -> Self {
        let evaluations = runner.evaluations().to_vec();
        let trades_accepted = evaluations
            .iter()
            .filter(|e| !e.accepted_by.is_empty())
            .count();

        let strategies = runner
            .strategies()
            .iter()
            .map(|s| StrategyReport {
                summary: s.summary(),
                pairs: pair_breakdown(s.ledger()),
            })
            .collect();

        BacktestReport {
            generated_at: Utc::now(),
            trades_evaluated: evaluations.len(),
            trades_accepted,
            trades_rejected_by_all: evaluations.len() - trades_accepted,
            strategies,
            evaluations,
        }
    }

    /// Highest total pips among strategies that completed at least one trade.
    pub fn best_strategy(&self) -> Option<&StrategySummary> {
        self.strategies
            .iter()
            .map(|r| &r.summary)
            .filter(|s| s.completed_trades > 0)
            .max_by(|a, b| a.total_pips.total_cmp(&b.total_pips))
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(70));
        println!("  STRATEGY BACKTEST REPORT");
        println!("{}", "=".repeat(70));
        println!(
            "  Generated:   {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!();
        println!("  INPUT");
        println!("  ───────────────────────────────────");
        println!("  Evaluated:   {}", self.trades_evaluated);
        println!("  Taken:       {}", self.trades_accepted);
        println!("  Rejected:    {}", self.trades_rejected_by_all);

        for report in &self.strategies {
            let s = &report.summary;
            println!();
            println!("  {}", s.name.to_uppercase());
            println!("  ───────────────────────────────────");
            println!("  {}", s.description);
            println!(
                "  Trades:      {} ({} completed)",
                s.total_trades, s.completed_trades
            );
            println!(
                "  W/L/BE:      {} / {} / {}",
                s.wins, s.losses, s.breakevens
            );
            println!("  Win Rate:    {:.1}%", s.win_rate);
            println!("  Pips:        {:+.1}", s.total_pips);
            println!("  Profit Factor: {:.2}", s.profit_factor);

            for p in &report.pairs {
                println!(
                    "  {:>8}: {} trades | WR {:.0}% | Pips {:+.1}",
                    p.pair, p.trades, p.win_rate, p.total_pips
                );
            }
        }

        if let Some(best) = self.best_strategy() {
            println!();
            println!("  Best:        {} ({:+.1} pips)", best.name, best.total_pips);
        }

        println!("{}", "=".repeat(70));
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
