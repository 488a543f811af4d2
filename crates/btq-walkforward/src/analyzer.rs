use btq_backtest::{BacktestConfig, BacktestOrchestrator, NullRunRepository};
use btq_ids::IdGenerator;
use btq_optimize::{extract_objective, OptimizationConfig, ParameterOptimizer};
use btq_replay::BarRepository;
use btq_strategy::StrategyFactory;
use rayon::prelude::*;
use rust_decimal::prelude::ToPrimitive;

use crate::config::WalkForwardConfig;
use crate::error::WalkForwardError;
use crate::result::{WalkForwardResult, WindowResult};
use crate::windows::{generate, WindowSpec};

/// Drives the window generator, in-sample optimizer, and out-of-sample
/// evaluator . Each window is an independent child run, so
/// windows execute in parallel via `rayon`; the aggregate's window
/// order is the window-generation order regardless of join order.
pub struct WalkForwardAnalyzer<'a> {
    bar_repository: &'a dyn BarRepository,
    strategy_factory: &'a dyn StrategyFactory,
    id_generator: &'a dyn IdGenerator,
}

impl<'a> WalkForwardAnalyzer<'a> {
    pub fn new(
        bar_repository: &'a dyn BarRepository,
        strategy_factory: &'a dyn StrategyFactory,
        id_generator: &'a dyn IdGenerator,
    ) -> Self {
        Self {
            bar_repository,
            strategy_factory,
            id_generator,
        }
    }

    pub fn run(&self, config: &WalkForwardConfig) -> Result<WalkForwardResult, WalkForwardError> {
        config.validate()?;
        config.base_config.validate()?;

        let specs = generate(config);
        if specs.len() < config.min_windows {
            return Err(WalkForwardError::InsufficientWindows {
                generated: specs.len(),
                min_windows: config.min_windows,
            });
        }

        let outcomes: Vec<Option<WindowResult>> = specs
            .par_iter()
            .map(|spec| self.run_window(config, spec))
            .collect();

        let windows: Vec<WindowResult> = outcomes.into_iter().flatten().collect();
        if windows.is_empty() {
            return Err(WalkForwardError::NoSuccessfulWindows);
        }

        Ok(aggregate(windows))
    }

    fn run_window(&self, config: &WalkForwardConfig, spec: &WindowSpec) -> Option<WindowResult> {
        let in_sample_base = BacktestConfig {
            id: self.id_generator.next_id().to_string(),
            start_date: spec.in_start,
            end_date: spec.in_end,
            ..config.base_config.clone()
        };

        let in_sample_optimization = OptimizationConfig {
            base_config: in_sample_base,
            ..config.optimization_config.clone()
        };

        let optimizer = ParameterOptimizer::new(self.bar_repository, self.strategy_factory, self.id_generator);
        let optimized = match optimizer.run(&in_sample_optimization) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "walk-forward window in-sample optimization failed; window skipped");
                return None;
            }
        };

        let out_sample_config = BacktestConfig {
            id: self.id_generator.next_id().to_string(),
            start_date: spec.out_start,
            end_date: spec.out_end,
            strategy_params: optimized.best_parameters.clone(),
            ..config.base_config.clone()
        };

        let null_repo = NullRunRepository;
        let orchestrator = BacktestOrchestrator::new(
            self.bar_repository,
            self.strategy_factory,
            self.id_generator,
            &null_repo,
        );
        let out_result = match orchestrator.run(out_sample_config) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "walk-forward window out-of-sample run failed; window skipped");
                return None;
            }
        };

        let out_metric = extract_objective(config.optimization_config.objective, &out_result.performance);
        let in_metric = optimized.best_objective_value;

        Some(WindowResult {
            in_start: spec.in_start,
            in_end: spec.in_end,
            out_start: spec.out_start,
            out_end: spec.out_end,
            best_parameters: optimized.best_parameters,
            in_metric,
            out_metric,
            degradation: in_metric - out_metric,
            in_result: optimized.best_result,
            out_result,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// its aggregation subsection: compounds out-of-sample returns,
/// averages out-of-sample Sharpe, and derives a stability score from the
/// standard deviation of out-of-sample returns.
fn aggregate(windows: Vec<WindowResult>) -> WalkForwardResult {
    let out_returns: Vec<f64> = windows
        .iter()
        .map(|w| w.out_result.total_return_percent.to_f64().unwrap_or(0.0))
        .collect();

    let combined_out_return_percent = (out_returns
        .iter()
        .fold(1.0, |acc, r| acc * (1.0 + r / 100.0))
        - 1.0)
        * 100.0;

    let out_sharpes: Vec<f64> = windows.iter().map(|w| w.out_result.performance.risk.sharpe_ratio).collect();
    let avg_out_sharpe = mean(&out_sharpes);

    let stability_score = if out_returns.len() < 2 {
        1.0
    } else {
        let mu = mean(&out_returns);
        let variance = out_returns.iter().map(|r| (r - mu).powi(2)).sum::<f64>() / out_returns.len() as f64;
        let sigma = variance.sqrt();
        1.0 / (1.0 + sigma / 100.0)
    };

    WalkForwardResult {
        windows,
        combined_out_return_percent,
        avg_out_sharpe,
        stability_score,
    }
}
