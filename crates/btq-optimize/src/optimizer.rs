use std::time::Instant;

use btq_backtest::{BacktestConfig, BacktestOrchestrator, NullRunRepository};
use btq_ids::IdGenerator;
use btq_replay::BarRepository;
use btq_strategy::{StrategyFactory, StrategyParams};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::combinations::enumerate;
use crate::config::{OptimizationConfig, OptimizationMethod};
use crate::error::OptimizationError;
use crate::objective::extract;
use crate::result::{ChildRunSummary, OptimizationResult};

/// Grid/random parameter search over a base config. Each
/// combination runs as an independent child backtest through the same
/// [`BacktestOrchestrator`] machinery the single-run API uses, against a
/// [`NullRunRepository`] — child runs are not individually persisted, only
/// the aggregate [`OptimizationResult`] is returned to the caller.
pub struct ParameterOptimizer<'a> {
    bar_repository: &'a dyn BarRepository,
    strategy_factory: &'a dyn StrategyFactory,
    id_generator: &'a dyn IdGenerator,
}

impl<'a> ParameterOptimizer<'a> {
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

    pub fn run(&self, config: &OptimizationConfig) -> Result<OptimizationResult, OptimizationError> {
        config.validate()?;

        let started = Instant::now();
        let all_combos = enumerate(&config.parameter_ranges);

        let selected = match config.method {
            OptimizationMethod::Grid => {
                if all_combos.len() > config.max_runs {
                    return Err(OptimizationError::Overflow {
                        combinations: all_combos.len(),
                        max_runs: config.max_runs,
                    });
                }
                all_combos
            }
            OptimizationMethod::Random => {
                let mut rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(0));
                let mut shuffled = all_combos;
                shuffled.shuffle(&mut rng);
                let take = config.max_runs.min(shuffled.len());
                shuffled.truncate(take);
                shuffled
            }
        };

        let null_repo = NullRunRepository;
        let orchestrator = BacktestOrchestrator::new(
            self.bar_repository,
            self.strategy_factory,
            self.id_generator,
            &null_repo,
        );

        let outcomes: Vec<(StrategyParams, Option<(f64, btq_backtest::BacktestResult)>)> = selected
            .par_iter()
            .map(|params| {
                let child_config = BacktestConfig {
                    id: self.id_generator.next_id().to_string(),
                    strategy_params: params.clone(),
                    ..config.base_config.clone()
                };
                match orchestrator.run(child_config) {
                    Ok(result) => {
                        let objective_value = extract(config.objective, &result.performance);
                        (params.clone(), Some((objective_value, result)))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "optimizer child run failed; skipped");
                        (params.clone(), None)
                    }
                }
            })
            .collect();

        let mut all_runs = Vec::with_capacity(outcomes.len());
        let mut best: Option<(StrategyParams, f64, btq_backtest::BacktestResult)> = None;

        for (params, outcome) in outcomes {
            match outcome {
                Some((objective_value, result)) => {
                    all_runs.push(ChildRunSummary {
                        parameters: params.clone(),
                        objective_value: Some(objective_value),
                    });
                    let replace = match &best {
                        None => true,
                        Some((_, best_value, _)) => objective_value > *best_value,
                    };
                    if replace {
                        best = Some((params, objective_value, result));
                    }
                }
                None => all_runs.push(ChildRunSummary {
                    parameters: params,
                    objective_value: None,
                }),
            }
        }

        let (best_parameters, best_objective_value, best_result) =
            best.ok_or(OptimizationError::NoSuccessfulRuns)?;

        Ok(OptimizationResult {
            best_parameters,
            best_objective_value,
            best_result,
            total_runs: all_runs.len(),
            all_runs,
            wall_duration_ms: started.elapsed().as_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_decimal::Money;
    use btq_ids::MonotonicIdGenerator;
    use btq_market::{Bar, Timeframe};
    use btq_replay::ReplayError;
    use btq_strategy::DefaultStrategyFactory;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    struct FixedBars(Vec<Bar>);

    impl BarRepository for FixedBars {
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
                    symbols.contains(&b.symbol)
                        && b.timeframe.as_str() == timeframe
                        && b.timestamp >= start_ts
                        && b.timestamp <= end_ts
                })
                .cloned()
                .collect())
        }
    }

    fn bar(day: u32) -> Bar {
        let ts = NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let p = Money::parse("100").unwrap();
        Bar::restore("AAPL", Timeframe::new("1d"), ts, p, p, p, p, Decimal::from(1_000), true).unwrap()
    }

    fn base_config() -> BacktestConfig {
        BacktestConfig {
            id: "base".into(),
            strategy_id: "strat-1".into(),
            strategy_type: None,
            symbols: vec!["AAPL".into()],
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
            timeframe: Timeframe::new("1d"),
            initial_capital: Money::from_i64(1_000_000),
            commission_rate: Decimal::ZERO,
            slippage_rate: Decimal::ZERO,
            strategy_params: StrategyParams::new(),
            account_tag: "default".into(),
        }
    }

    #[test]
    fn grid_overflow_is_rejected_before_any_child_run() {
        let bars = FixedBars(vec![]);
        let factory = DefaultStrategyFactory;
        let ids = MonotonicIdGenerator::new();
        let optimizer = ParameterOptimizer::new(&bars, &factory, &ids);

        let mut ranges = BTreeMap::new();
        ranges.insert("p".to_string(), vec![serde_json::json!(1), serde_json::json!(2)]);
        ranges.insert("q".to_string(), vec![serde_json::json!(10), serde_json::json!(20)]);

        let config = OptimizationConfig {
            base_config: base_config(),
            parameter_ranges: ranges,
            method: OptimizationMethod::Grid,
            objective: crate::config::Objective::TotalReturn,
            max_runs: 2,
            seed: None,
        };

        let err = optimizer.run(&config).unwrap_err();
        assert!(matches!(err, OptimizationError::Overflow { combinations: 4, max_runs: 2 }));
    }

    #[test]
    fn grid_search_with_identical_results_picks_first_combination() {
        let bars = FixedBars(vec![]);
        let factory = DefaultStrategyFactory;
        let ids = MonotonicIdGenerator::new();
        let optimizer = ParameterOptimizer::new(&bars, &factory, &ids);

        let mut ranges = BTreeMap::new();
        ranges.insert("p".to_string(), vec![serde_json::json!(1), serde_json::json!(2)]);
        ranges.insert("q".to_string(), vec![serde_json::json!(10), serde_json::json!(20)]);

        let config = OptimizationConfig {
            base_config: base_config(),
            parameter_ranges: ranges,
            method: OptimizationMethod::Grid,
            objective: crate::config::Objective::TotalReturn,
            max_runs: 4,
            seed: None,
        };

        let result = optimizer.run(&config).unwrap();
        assert_eq!(result.total_runs, 4);
        // every run sees zero bars so every objective is 0.0; first wins
        assert_eq!(result.best_parameters["p"], serde_json::json!(1));
        assert_eq!(result.best_parameters["q"], serde_json::json!(10));
    }

    #[test]
    fn random_search_respects_max_runs_cap() {
        let bars = FixedBars((1..=5).map(bar).collect());
        let factory = DefaultStrategyFactory;
        let ids = MonotonicIdGenerator::new();
        let optimizer = ParameterOptimizer::new(&bars, &factory, &ids);

        let mut ranges = BTreeMap::new();
        ranges.insert("p".to_string(), vec![serde_json::json!(1), serde_json::json!(2), serde_json::json!(3)]);
        ranges.insert("q".to_string(), vec![serde_json::json!(10), serde_json::json!(20)]);

        let config = OptimizationConfig {
            base_config: base_config(),
            parameter_ranges: ranges,
            method: OptimizationMethod::Random,
            objective: crate::config::Objective::TotalReturn,
            max_runs: 3,
            seed: Some(42),
        };

        let result = optimizer.run(&config).unwrap();
        assert_eq!(result.total_runs, 3);
    }
}
