use btq_decimal::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::equity_curve::EquityPoint;

/// Annual risk-free rate used by the Sharpe ratio.
pub const RISK_FREE_RATE_PERCENT: f64 = 3.00;

/// Default confidence level for VaR/CVaR.
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub volatility: f64,
    pub downside_deviation: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub value_at_risk: f64,
    pub conditional_value_at_risk: f64,
    /// Reported as a negative number (a drawdown of 12% is `-12.0`).
    pub max_drawdown: f64,
    pub calmar_ratio: f64,
    pub recovery_factor: f64,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn variance_around(values: &[f64], mu: f64) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|r| (r - mu).powi(2)).sum::<f64>() / values.len() as f64
    }
}

/// Sorts `returns` ascending, picks `floor((1 - confidence) * n)` clamped
/// to `[0, n-1]` per the VaR definition below.
fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    let idx = (((1.0 - confidence) * n as f64).floor() as isize)
        .clamp(0, n as isize - 1) as usize;
    sorted[idx]
}

fn conditional_value_at_risk(returns: &[f64], var: f64) -> f64 {
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r < var).collect();
    if tail.is_empty() {
        var
    } else {
        mean(&tail)
    }
}

/// Scans an equity curve tracking the running peak; at each point
/// `drawdown% = (peak - equity) / peak * 100`. Returns the maximum
/// drawdown encountered, as a negative number (`0.0` for an empty or
/// single-point curve, or one that never dips below its starting peak).
fn max_drawdown_percent(curve: &[EquityPoint]) -> f64 {
    if curve.is_empty() {
        return 0.0;
    }
    let mut peak = curve[0].equity;
    let mut worst = 0.0f64;
    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak.is_positive() {
            let drawdown_ratio = (peak - point.equity).div_ratio(peak) * Decimal::from(100);
            let drawdown = rust_decimal::prelude::ToPrimitive::to_f64(&drawdown_ratio).unwrap_or(0.0);
            if drawdown > worst {
                worst = drawdown;
            }
        }
    }
    -worst
}

/// Computes all risk metrics from per-trade return percentages
/// (already `* 100` scale, matching `Trade::return_pct`) and the
/// corresponding equity curve, plus the run's already-computed
/// `annual_return_percent` and `total_return_percent` — Calmar divides by
/// the former, RecoveryFactor by the latter; both share the same
/// `|maxDrawdown|` denominator.
pub fn compute_risk_metrics(
    returns_percent: &[f64],
    equity_curve: &[EquityPoint],
    annual_return_percent: f64,
    total_return_percent: f64,
) -> RiskMetrics {
    let mu = mean(returns_percent);
    let volatility = variance_around(returns_percent, mu).sqrt();

    let downside: Vec<f64> = returns_percent.iter().copied().filter(|r| *r < 0.0).collect();
    let downside_deviation = if downside.is_empty() {
        0.0
    } else {
        variance_around(&downside, mean(&downside)).sqrt()
    };

    let excess = annual_return_percent - RISK_FREE_RATE_PERCENT;
    let sharpe_ratio = if volatility == 0.0 { 0.0 } else { excess / volatility };
    let sortino_ratio = if downside_deviation == 0.0 {
        0.0
    } else {
        excess / downside_deviation
    };

    let var = value_at_risk(returns_percent, DEFAULT_VAR_CONFIDENCE);
    let cvar = conditional_value_at_risk(returns_percent, var);

    let max_drawdown = max_drawdown_percent(equity_curve);
    let calmar_ratio = if max_drawdown == 0.0 {
        0.0
    } else {
        annual_return_percent / max_drawdown.abs()
    };
    let recovery_factor = recovery_factor(total_return_percent, max_drawdown);

    RiskMetrics {
        volatility,
        downside_deviation,
        sharpe_ratio,
        sortino_ratio,
        value_at_risk: var,
        conditional_value_at_risk: cvar,
        max_drawdown,
        calmar_ratio,
        recovery_factor,
    }
}

/// Recomputes `recovery_factor` against `total_return_percent` rather than
/// the annualized return Calmar uses — both ratios are defined against
/// different numerators even though both divide by `|maxDrawdown|`.
pub fn recovery_factor(total_return_percent: f64, max_drawdown_percent: f64) -> f64 {
    if max_drawdown_percent == 0.0 {
        0.0
    } else {
        total_return_percent / max_drawdown_percent.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_decimal::Money;
    use chrono::NaiveDate;

    fn point(day: u32, equity: &str) -> EquityPoint {
        let ts = NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        EquityPoint {
            timestamp: ts,
            equity: Money::parse(equity).unwrap(),
        }
    }

    #[test]
    fn max_drawdown_tracks_peak_to_trough() {
        let curve = vec![point(1, "1000"), point(2, "1200"), point(3, "900"), point(4, "1100")];
        let dd = max_drawdown_percent(&curve);
        // worst drawdown: (1200-900)/1200*100 = 25
        assert!((dd - (-25.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_volatility_yields_zero_sharpe() {
        let metrics = compute_risk_metrics(&[5.0, 5.0, 5.0], &[point(1, "1000")], 10.0, 10.0);
        assert_eq!(metrics.volatility, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
    }

    #[test]
    fn var_picks_floor_index_of_sorted_returns() {
        let returns = vec![-10.0, -5.0, 0.0, 5.0, 10.0];
        let var = value_at_risk(&returns, 0.95);
        // floor((1-0.95)*5) = floor(0.25) = 0 -> sorted[0] = -10.0
        assert_eq!(var, -10.0);
    }
}
