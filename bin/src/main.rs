//! balanza CLI binary.
//!
//! Fetches financial metrics, daily bars, market cap and insider trades
//! from a configured provider and prints the canonical records.

mod cmd;
mod output;
mod source;

use std::{path::PathBuf, process};

use anyhow::{Context, Result};
use balanza::{Balanza, ColumnMap};
use clap::{Parser, Subcommand};
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    output::Format,
    source::{Source, SourceKind},
};

#[derive(Parser)]
#[command(name = "balanza")]
#[command(about = "Canonical financial records from market data providers", long_about = None)]
#[command(version)]
struct Cli {
    /// Data provider to query
    #[arg(long, value_enum, default_value = "fd", global = true)]
    source: SourceKind,

    /// Root directory of JSON record dumps (records source only)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON column map merged over the provider's defaults
    #[arg(long, global = true)]
    columns: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: Format,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonical financial metrics for one reporting period
    Metrics {
        /// Ticker symbol
        ticker: String,

        /// Latest period end to consider (YYYY-MM-DD, default today)
        #[arg(short, long)]
        report_period: Option<String>,

        /// Period kind (ttm, annual, quarterly)
        #[arg(short, long, default_value = "ttm")]
        period: String,

        /// Maximum rows to request from the provider
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Daily OHLCV bars
    Prices {
        /// Ticker symbol
        ticker: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD, default today)
        #[arg(long)]
        end: Option<String>,
    },

    /// Latest market capitalization
    MarketCap {
        /// Ticker symbol
        ticker: String,
    },

    /// Insider trades, most recent filing first
    InsiderTrades {
        /// Ticker symbol
        ticker: String,

        /// Latest filing date to include (YYYY-MM-DD, default today)
        #[arg(long)]
        end_date: Option<String>,

        /// Maximum number of trades
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Print the effective column map as JSON
    Columns,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = Source::open(cli.source, cli.data_dir.as_deref())?;
    debug!(source = %cli.source, "provider selected");

    let mut balanza = Balanza::new(source);
    if let Some(path) = &cli.columns {
        balanza = balanza.with_columns(load_columns(path)?);
    }

    match cli.command {
        Commands::Metrics {
            ticker,
            report_period,
            period,
            limit,
        } => {
            cmd::metrics::show_metrics(&balanza, &ticker, report_period, &period, limit, cli.format)
                .await?;
        }
        Commands::Prices { ticker, start, end } => {
            cmd::prices::show_prices(&balanza, &ticker, &start, end, cli.format).await?;
        }
        Commands::MarketCap { ticker } => {
            cmd::market_cap::show_market_cap(&balanza, &ticker, cli.format).await?;
        }
        Commands::InsiderTrades {
            ticker,
            end_date,
            limit,
        } => {
            cmd::insider::show_insider_trades(&balanza, &ticker, end_date, limit, cli.format)
                .await?;
        }
        Commands::Columns => {
            cmd::columns::show_columns(&balanza)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so JSON output stays parseable.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn load_columns(path: &std::path::Path) -> Result<ColumnMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading column map {}", path.display()))?;
    ColumnMap::from_json_str(&text)
        .with_context(|| format!("parsing column map {}", path.display()))
}
