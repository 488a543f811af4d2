use anyhow::{Context, Result};
use btq_backtest::BacktestResult;
use btq_montecarlo::{MonteCarloConfig, MonteCarloMethod, MonteCarloSimulator, DEFAULT_HISTOGRAM_BINS};
use serde::Deserialize;

use crate::config::load_layered_yaml;

/// The CLI-facing slice of a Monte-Carlo config: everything except
/// `base_pnls`/`initial_capital`, which come from the `--from` result
/// report instead of a YAML file (its `baseResult` attribute).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonteCarloCliConfig {
    method: MonteCarloMethod,
    num_simulations: usize,
    confidence_level: f64,
    #[serde(default = "default_block_size")]
    block_size: usize,
    #[serde(default)]
    preserve_correlation: bool,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_histogram_bins")]
    histogram_bins: usize,
}

fn default_block_size() -> usize {
    5
}

fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

pub fn run(config_paths: &[String], from_path: &str, json: bool) -> Result<()> {
    let loaded = load_layered_yaml(config_paths)?;
    let cli_config: MonteCarloCliConfig =
        serde_json::from_value(loaded.value).context("config does not match a Monte-Carlo configuration")?;

    let raw = std::fs::read_to_string(from_path)
        .with_context(|| format!("read base result: {from_path}"))?;
    let base_result: BacktestResult =
        serde_json::from_str(&raw).with_context(|| format!("parse base result: {from_path}"))?;

    let seed = super::resolve_seed(cli_config.seed);

    let mut config = MonteCarloConfig::from_backtest_result(
        &base_result,
        cli_config.method,
        cli_config.num_simulations,
        cli_config.confidence_level,
        cli_config.block_size,
        cli_config.preserve_correlation,
        Some(seed),
    );
    config.histogram_bins = cli_config.histogram_bins;

    tracing::info!(config_hash = %loaded.config_hash, base_trades = config.base_pnls.len(), "loaded monte-carlo config");

    let simulator = MonteCarloSimulator;
    let result = simulator.run(&config)?;

    println!("num_simulations={}", result.num_simulations);
    println!("mean_return_percent={}", result.mean_return_percent);
    println!("median_return_percent={}", result.median_return_percent);
    println!("value_at_risk_percent={}", result.value_at_risk_percent);
    println!(
        "conditional_value_at_risk_percent={}",
        result.conditional_value_at_risk_percent
    );
    println!("probability_of_profit={}", result.probability_of_profit);

    super::maybe_print_json(&result, json)
}
