use btq_backtest::BacktestResult;
use btq_strategy::StrategyParams;
use serde::{Deserialize, Serialize};

/// One child run's outcome, whether or not it produced a usable objective
/// value — part of the optimizer's `all_runs` summary list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChildRunSummary {
    pub parameters: StrategyParams,
    /// `None` when the child run failed (logged and skipped —
    /// a failed child never invalidates the optimization as a whole).
    pub objective_value: Option<f64>,
}

/// The outcome of a parameter search: the winning parameters, its
/// objective value and full result, every child run's summary, and the
/// search's total run count and wall-clock duration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_parameters: StrategyParams,
    pub best_objective_value: f64,
    pub best_result: BacktestResult,
    pub all_runs: Vec<ChildRunSummary>,
    pub total_runs: usize,
    pub wall_duration_ms: u128,
}
