pub mod backtest;
pub mod montecarlo;
pub mod optimize;
pub mod portfolio;
pub mod walkforward;

use btq_decimal::Money;
use btq_market::Bar;
use btq_replay::{BarRepository, ReplayError};

/// In-memory [`BarRepository`] over the bars the CLI loaded from CSV.
/// The CLI is the only caller that materializes bars before a run starts,
/// so a straight linear-filter fake is enough here — no persistence.
pub struct CsvBarRepository(pub Vec<Bar>);

impl BarRepository for CsvBarRepository {
    fn find_bars(
        &self,
        symbols: &[String],
        timeframe: &str,
        start_ts: btq_decimal::Timestamp,
        end_ts: btq_decimal::Timestamp,
    ) -> Result<Vec<Bar>, ReplayError> {
        Ok(self
            .0
            .iter()
            .filter(|b| {
                symbols.iter().any(|s| s == &b.symbol)
                    && b.timeframe.as_str() == timeframe
                    && b.timestamp >= start_ts
                    && b.timestamp <= end_ts
            })
            .cloned()
            .collect())
    }
}

/// Resolves a seed for a seeded PRNG path: returns the caller's explicit
/// seed unchanged, or an OS-sourced one when absent. Only the CLI is
/// allowed to do this (core crates never fall back to
/// `rand::thread_rng()`); the chosen seed is logged so the run stays
/// reproducible after the fact even when it wasn't pinned up front.
pub fn resolve_seed(explicit: Option<u64>) -> u64 {
    match explicit {
        Some(seed) => seed,
        None => {
            let seed: u64 = rand::random();
            tracing::info!(seed, "no seed supplied; using OS-seeded value");
            seed
        }
    }
}

pub fn print_money(label: &str, value: Money) {
    println!("{label}={value}");
}

pub fn maybe_print_json<T: serde::Serialize>(value: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}
