use btq_analytics::PerformanceReport;
use btq_broker::{Fill, Order};
use btq_decimal::{Money, Timestamp};
use btq_strategy::Signal;
use btq_trades::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::BacktestConfig;
use crate::repository::RunStatus;

/// The immutable, owned outcome of a completed run, per 's
/// `BacktestResult` entity. Once returned from
/// [`crate::BacktestOrchestrator::run`], this is shared read-only — there
/// is no mutator exposed on any field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BacktestResult {
    pub config: BacktestConfig,
    pub status: RunStatus,
    pub start_wall: Timestamp,
    pub end_wall: Timestamp,
    pub signals: Vec<Signal>,
    pub orders: Vec<Order>,
    pub fills: Vec<Fill>,
    pub trades: Vec<Trade>,
    pub final_capital: Money,
    pub total_return_percent: Decimal,
    /// Trade statistics, risk metrics, and the equity curve bundled
    /// together: the report's `metrics`, `risk`, and `curve`
    /// fields, computed in one pass by `btq-analytics::analyze`.
    pub performance: PerformanceReport,
}
