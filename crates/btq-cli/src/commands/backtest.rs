use anyhow::{Context, Result};
use btq_backtest::{BacktestConfig, BacktestOrchestrator, NullRunRepository};
use btq_ids::MonotonicIdGenerator;
use btq_strategy::DefaultStrategyFactory;

use crate::bars::load_csv_file;
use crate::config::load_layered_yaml;

use super::CsvBarRepository;

pub fn run(config_paths: &[String], bars_path: &str, json: bool) -> Result<()> {
    let loaded = load_layered_yaml(config_paths)?;
    let config: BacktestConfig =
        serde_json::from_value(loaded.value).context("config does not match BacktestConfig")?;

    tracing::info!(config_hash = %loaded.config_hash, run_id = %config.id, "loaded backtest config");

    let bars = load_csv_file(bars_path)?;
    let repo = CsvBarRepository(bars);
    let factory = DefaultStrategyFactory;
    let ids = MonotonicIdGenerator::new();
    let run_repository = NullRunRepository;

    let orchestrator = BacktestOrchestrator::new(&repo, &factory, &ids, &run_repository);
    let result = orchestrator.run(config)?;

    println!("run_id={}", result.config.id);
    println!("status={:?}", result.status);
    println!("final_capital={}", result.final_capital);
    println!("total_return_percent={}%", result.total_return_percent);
    println!(
        "trades total={} winning={} losing={}",
        result.performance.trade_stats.total_trades,
        result.performance.trade_stats.winning_trades,
        result.performance.trade_stats.losing_trades
    );
    println!("sharpe_ratio={}", result.performance.risk.sharpe_ratio);
    println!("max_drawdown_percent={}", result.performance.risk.max_drawdown);

    super::maybe_print_json(&result, json)
}
