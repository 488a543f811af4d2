use anyhow::{Context, Result};
use btq_ids::MonotonicIdGenerator;
use btq_portfolio::{PortfolioConfig, PortfolioEngine};
use btq_strategy::DefaultStrategyFactory;

use crate::bars::load_csv_file;
use crate::config::load_layered_yaml;

use super::CsvBarRepository;

pub fn run(config_paths: &[String], bars_path: &str, json: bool) -> Result<()> {
    let loaded = load_layered_yaml(config_paths)?;
    let config: PortfolioConfig =
        serde_json::from_value(loaded.value).context("config does not match PortfolioConfig")?;

    tracing::info!(config_hash = %loaded.config_hash, run_id = %config.id, "loaded portfolio config");

    let bars = load_csv_file(bars_path)?;
    let repo = CsvBarRepository(bars);
    let factory = DefaultStrategyFactory;
    let ids = MonotonicIdGenerator::new();

    let engine = PortfolioEngine::new(&repo, &factory, &ids);
    let result = engine.run(&config)?;

    println!("symbols={}", result.symbol_results.len());
    println!("final_capital={}", result.final_capital);
    println!("total_return_percent={}%", result.total_return_percent);
    println!("sharpe_ratio={}", result.portfolio_performance.risk.sharpe_ratio);
    for sr in &result.symbol_results {
        println!(
            "  {} weight={} allocated_capital={} final_capital={}",
            sr.symbol, sr.weight, sr.allocated_capital, sr.result.final_capital
        );
    }

    super::maybe_print_json(&result, json)
}
