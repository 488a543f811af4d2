use anyhow::{Context, Result};
use btq_ids::MonotonicIdGenerator;
use btq_strategy::DefaultStrategyFactory;
use btq_walkforward::{WalkForwardAnalyzer, WalkForwardConfig};

use crate::bars::load_csv_file;
use crate::config::load_layered_yaml;

use super::CsvBarRepository;

pub fn run(config_paths: &[String], bars_path: &str, json: bool) -> Result<()> {
    let loaded = load_layered_yaml(config_paths)?;
    let mut config: WalkForwardConfig =
        serde_json::from_value(loaded.value).context("config does not match WalkForwardConfig")?;
    config.optimization_config.seed = Some(super::resolve_seed(config.optimization_config.seed));

    tracing::info!(config_hash = %loaded.config_hash, "loaded walk-forward config");

    let bars = load_csv_file(bars_path)?;
    let repo = CsvBarRepository(bars);
    let factory = DefaultStrategyFactory;
    let ids = MonotonicIdGenerator::new();

    let analyzer = WalkForwardAnalyzer::new(&repo, &factory, &ids);
    let result = analyzer.run(&config)?;

    println!("windows={}", result.windows.len());
    println!("combined_out_return_percent={}", result.combined_out_return_percent);
    println!("avg_out_sharpe={}", result.avg_out_sharpe);
    println!("stability_score={}", result.stability_score);

    super::maybe_print_json(&result, json)
}
