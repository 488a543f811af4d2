//! `btq` — thin ambient CLI over the core crates.
//!
//! Not a new library contract: every subcommand loads a layered YAML
//! config, loads bars from CSV where relevant, drives one of the core
//! engines, and prints a human-readable summary plus an optional `--json`
//! dump of the full result. No business logic lives here.

mod bars;
mod commands;
mod config;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "btq")]
#[command(about = "Backtesting & post-trade analytics core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Single-config backtest runs.
    Backtest {
        #[command(subcommand)]
        cmd: RunCmd,
    },
    /// Grid/random parameter search.
    Optimize {
        #[command(subcommand)]
        cmd: RunCmd,
    },
    /// Rolling/anchored walk-forward validation.
    Walkforward {
        #[command(subcommand)]
        cmd: RunCmd,
    },
    /// Multi-symbol weighted portfolio backtests.
    Portfolio {
        #[command(subcommand)]
        cmd: RunCmd,
    },
    /// Resampling-based Monte-Carlo simulation over a prior run's trades.
    Montecarlo {
        #[command(subcommand)]
        cmd: MonteCarloCmd,
    },
}

#[derive(Subcommand)]
enum RunCmd {
    Run {
        /// Layered YAML config paths, merged in order (later overrides earlier).
        #[arg(long = "config", required = true)]
        config: Vec<String>,
        /// CSV bar file.
        #[arg(long)]
        bars: String,
        /// Print the full result as JSON in addition to the summary.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum MonteCarloCmd {
    Run {
        /// Layered YAML config paths for the Monte-Carlo settings.
        #[arg(long = "config", required = true)]
        config: Vec<String>,
        /// Path to a prior `BacktestResult` JSON report (the `baseResult`).
        #[arg(long)]
        from: String,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Backtest { cmd: RunCmd::Run { config, bars, json } } => {
            commands::backtest::run(&config, &bars, json)
        }
        Commands::Optimize { cmd: RunCmd::Run { config, bars, json } } => {
            commands::optimize::run(&config, &bars, json)
        }
        Commands::Walkforward { cmd: RunCmd::Run { config, bars, json } } => {
            commands::walkforward::run(&config, &bars, json)
        }
        Commands::Portfolio { cmd: RunCmd::Run { config, bars, json } } => {
            commands::portfolio::run(&config, &bars, json)
        }
        Commands::Montecarlo { cmd: MonteCarloCmd::Run { config, from, json } } => {
            commands::montecarlo::run(&config, &from, json)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
