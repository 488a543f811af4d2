use btq_backtest::BacktestResult;
use btq_decimal::TradeDate;
use btq_strategy::StrategyParams;
use serde::{Deserialize, Serialize};

/// One window's in-sample optimization and out-of-sample evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WindowResult {
    pub in_start: TradeDate,
    pub in_end: TradeDate,
    pub out_start: TradeDate,
    pub out_end: TradeDate,
    pub best_parameters: StrategyParams,
    pub in_metric: f64,
    pub out_metric: f64,
    pub degradation: f64,
    pub in_result: BacktestResult,
    pub out_result: BacktestResult,
}

/// The outcome of a walk-forward validation run, including its aggregated
/// out-of-sample statistics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalkForwardResult {
    pub windows: Vec<WindowResult>,
    pub combined_out_return_percent: f64,
    pub avg_out_sharpe: f64,
    pub stability_score: f64,
}
