use btq_decimal::{days_between, Money, Timestamp};
use btq_trades::Trade;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::equity_curve::{build_equity_curve, EquityPoint};
use crate::risk::{compute_risk_metrics, RiskMetrics};
use crate::trade_stats::{compute_trade_statistics, TradeStatistics};

/// The full analytics bundle derived from a run: return figures,
/// trade statistics, risk metrics, and the equity curve they're all
/// computed from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_return_percent: Decimal,
    pub annual_return_percent: f64,
    pub trade_stats: TradeStatistics,
    pub risk: RiskMetrics,
    pub equity_curve: Vec<EquityPoint>,
}

/// Runs the full performance and risk analysis over a run's closed trades.
///
/// `trades` must already be in close order (chronological) — both the
/// equity curve and the streak/consecutive-win-loss statistics depend on
/// that ordering, and this function does not sort.
pub fn analyze(
    start_wall: Timestamp,
    end_wall: Timestamp,
    initial_capital: Money,
    final_capital: Money,
    trades: &[Trade],
) -> PerformanceReport {
    let total_return_percent = total_return_percent(initial_capital, final_capital);

    let days = days_between(start_wall.date(), end_wall.date());
    let years = days as f64 / 365.0;
    let total_return_f64 = total_return_percent.to_f64().unwrap_or(0.0);
    let annual_return_percent = if days <= 0 {
        0.0
    } else {
        total_return_f64 / years
    };

    let trade_stats = compute_trade_statistics(trades);
    let equity_curve = build_equity_curve(start_wall, initial_capital, trades);

    let returns_percent: Vec<f64> = trades
        .iter()
        .filter_map(|t| t.return_pct)
        .filter_map(|r| r.to_f64())
        .collect();

    let risk = compute_risk_metrics(
        &returns_percent,
        &equity_curve,
        annual_return_percent,
        total_return_f64,
    );

    PerformanceReport {
        total_return_percent,
        annual_return_percent,
        trade_stats,
        risk,
        equity_curve,
    }
}

/// `(final - initial) / initial * 100`, per its `BacktestResult`
/// invariant. `0` if `initial` is zero (a misconfigured run, not a
/// division this function should panic on).
pub fn total_return_percent(initial_capital: Money, final_capital: Money) -> Decimal {
    (final_capital - initial_capital).div_ratio(initial_capital) * Decimal::from(100)
}
