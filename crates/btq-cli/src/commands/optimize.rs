use anyhow::{Context, Result};
use btq_ids::MonotonicIdGenerator;
use btq_optimize::{OptimizationConfig, ParameterOptimizer};
use btq_strategy::DefaultStrategyFactory;

use crate::bars::load_csv_file;
use crate::config::load_layered_yaml;

use super::CsvBarRepository;

pub fn run(config_paths: &[String], bars_path: &str, json: bool) -> Result<()> {
    let loaded = load_layered_yaml(config_paths)?;
    let mut config: OptimizationConfig =
        serde_json::from_value(loaded.value).context("config does not match OptimizationConfig")?;
    config.seed = Some(super::resolve_seed(config.seed));

    tracing::info!(config_hash = %loaded.config_hash, "loaded optimization config");

    let bars = load_csv_file(bars_path)?;
    let repo = CsvBarRepository(bars);
    let factory = DefaultStrategyFactory;
    let ids = MonotonicIdGenerator::new();

    let optimizer = ParameterOptimizer::new(&repo, &factory, &ids);
    let result = optimizer.run(&config)?;

    println!("total_runs={}", result.total_runs);
    println!("wall_duration_ms={}", result.wall_duration_ms);
    println!("best_objective_value={}", result.best_objective_value);
    println!(
        "best_parameters={}",
        serde_json::to_string(&result.best_parameters)?
    );
    println!("best_final_capital={}", result.best_result.final_capital);

    super::maybe_print_json(&result, json)
}
