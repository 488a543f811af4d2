use btq_analytics::PerformanceReport;
use rust_decimal::prelude::ToPrimitive;

use crate::config::Objective;

/// Extracts the scalar a [`crate::ParameterOptimizer`] maximizes from a
/// child run's performance report. All five
/// objectives are always present on a computed report, so there is no
/// "missing" case here in practice; a `to_f64` conversion failure (never
/// observed for the finite values this report produces) falls back to
/// `0.0` rather than panicking.
pub fn extract(objective: Objective, report: &PerformanceReport) -> f64 {
    match objective {
        Objective::TotalReturn => report.total_return_percent.to_f64().unwrap_or(0.0),
        Objective::SharpeRatio => report.risk.sharpe_ratio,
        Objective::SortinoRatio => report.risk.sortino_ratio,
        Objective::ProfitFactor => report.trade_stats.profit_factor.to_f64().unwrap_or(0.0),
        Objective::CalmarRatio => report.risk.calmar_ratio,
    }
}
