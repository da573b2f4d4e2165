use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use felix_strategies::backtesting::{load_trades, BacktestRunner};
use felix_strategies::config::{Config, MarketTables};
use felix_strategies::models::{Direction, MarketCondition};
use felix_strategies::strategies::{FelixStrategy, Strategy};
use felix_strategies::trading::Trade;

const FELIX_NAME: &str = "Felix Original Strategy";

#[derive(Parser, Debug)]
#[command(name = "backtest", about = "Evaluate trades against the strategy roster")]
struct Cli {
    /// Market tables JSON; overrides MARKET_TABLES
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every strategy over a trade file and report
    Run {
        #[arg(short, long)]
        trades: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Evaluate on one thread
        #[arg(long)]
        serial: bool,
    },
    /// Score one prospective trade with the composite strategy
    Score {
        #[arg(long)]
        pair: String,
        #[arg(long)]
        entry: f64,
        #[arg(long)]
        direction: String,
        #[arg(long, default_value = "unknown")]
        condition: String,
    },
    /// Position size at 1% risk
    Size {
        #[arg(long)]
        balance: Option<f64>,
        #[arg(long)]
        sl_pips: f64,
        #[arg(long)]
        pair: String,
    },
    /// Print the composite strategy's configuration
    Profile,
}

fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let cli = Cli::parse();

    let tables = match &cli.tables {
        Some(path) => MarketTables::from_file(path),
        None => MarketTables::load(&cfg),
    }
    .context("loading market tables")?;

    match cli.command {
        Command::Run {
            trades,
            output,
            serial,
        } => run(&cfg, &tables, &trades, output, serial),
        Command::Score {
            pair,
            entry,
            direction,
            condition,
        } => score(&tables, &pair, entry, &direction, &condition),
        Command::Size {
            balance,
            sl_pips,
            pair,
        } => size(&tables, balance.unwrap_or(cfg.account_balance), sl_pips, &pair),
        Command::Profile => {
            let felix = FelixStrategy::from_tables(FELIX_NAME, &tables);
            println!("{}", serde_json::to_string_pretty(&felix.profile())?);
            Ok(())
        }
    }
}

fn run(
    cfg: &Config,
    tables: &MarketTables,
    trades_path: &Path,
    output: Option<PathBuf>,
    serial: bool,
) -> Result<()> {
    let loaded = load_trades(trades_path)
        .with_context(|| format!("reading trades from {}", trades_path.display()))?;
    if loaded.skipped > 0 {
        warn!("{} malformed trade records were skipped", loaded.skipped);
    }

    let mut runner = BacktestRunner::from_config(cfg, tables);
    if serial {
        runner = runner.with_parallelism(false);
    }
    runner.run(&loaded.trades);

    let report = runner.report();
    report.print_summary();

    let path = output.unwrap_or_else(|| {
        PathBuf::from(&cfg.report_dir).join(format!(
            "backtest_{}.json",
            Utc::now().format("%Y%m%d_%H%M%S")
        ))
    });
    report
        .save_json(&path)
        .with_context(|| format!("saving report to {}", path.display()))?;
    info!("Report saved to {}", path.display());
    println!("\nReport saved to: {}", path.display());

    Ok(())
}

fn score(
    tables: &MarketTables,
    pair: &str,
    entry: f64,
    direction: &str,
    condition: &str,
) -> Result<()> {
    let direction: Direction = direction.parse().map_err(|e: String| anyhow!(e))?;
    let condition = MarketCondition::parse(condition);
    let felix = FelixStrategy::from_tables(FELIX_NAME, tables);

    let trade = Trade::new(pair, Some(entry), direction).with_condition(condition);
    let confidence = felix
        .confidence(&trade)
        .ok_or_else(|| anyhow!("trade cannot be scored"))?;
    let targets = felix.get_tp_targets(condition);

    println!("{} {} @ {} ({})", pair, direction, entry, condition);
    println!("  Confidence:  {:.4}", confidence);
    println!(
        "  Decision:    {}",
        if felix.should_take_trade(&trade) { "TAKE" } else { "SKIP" }
    );
    if felix.should_flip_direction(pair, entry, direction) {
        println!("  Level bias:  {} (consider flipping)", direction.opposite());
    }
    println!("  SL:          {} pips", felix.get_sl_for_market_condition(condition));
    println!(
        "  TP:          {} / {} / {} pips",
        targets.tp1, targets.tp2, targets.tp3
    );
    println!(
        "  Expected WR: {:.0}%",
        felix.win_rate_expectation(condition) * 100.0
    );
    Ok(())
}

fn size(tables: &MarketTables, balance: f64, sl_pips: f64, pair: &str) -> Result<()> {
    let felix = FelixStrategy::from_tables(FELIX_NAME, tables);
    let lots = felix
        .calculate_position_size(balance, sl_pips, pair)
        .context("sizing position")?;
    println!(
        "{}: {:.2} lots (balance ${:.2}, SL {} pips)",
        pair, lots, balance, sl_pips
    );
    Ok(())
}
