use btq_decimal::Money;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum number of equity points retained per reported simulation
/// (best, worst, median); curves are subsampled down to this many points.
const MAX_RETAINED_EQUITY_POINTS: usize = 100;

/// One simulated equity path over a resampled P&L vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub total_return_percent: f64,
    pub max_drawdown_percent: f64,
    /// Subsampled to at most [`MAX_RETAINED_EQUITY_POINTS`]; always
    /// includes the first and last point.
    pub equity_curve: Vec<Money>,
}

/// Runs one simulation: starts at `initial_capital`, applies each sampled
/// P&L in order, and tracks peak-to-trough drawdown.
pub fn simulate_one(initial_capital: Money, sampled_pnls: &[Money]) -> SimulationOutcome {
    let mut equity = initial_capital;
    let mut peak = initial_capital;
    let mut max_drawdown_percent = 0.0;
    let mut curve = Vec::with_capacity(sampled_pnls.len() + 1);
    curve.push(equity);

    for pnl in sampled_pnls {
        equity += *pnl;
        if equity > peak {
            peak = equity;
        }
        let drawdown_percent = ((peak - equity).div_ratio(peak) * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0);
        if drawdown_percent > max_drawdown_percent {
            max_drawdown_percent = drawdown_percent;
        }
        curve.push(equity);
    }

    let total_return_percent = ((equity - initial_capital).div_ratio(initial_capital) * Decimal::from(100))
        .to_f64()
        .unwrap_or(0.0);

    SimulationOutcome {
        total_return_percent,
        max_drawdown_percent,
        equity_curve: subsample(curve),
    }
}

fn subsample(curve: Vec<Money>) -> Vec<Money> {
    if curve.len() <= MAX_RETAINED_EQUITY_POINTS {
        return curve;
    }
    let last_idx = curve.len() - 1;
    let step = curve.len() as f64 / MAX_RETAINED_EQUITY_POINTS as f64;
    let mut indices: Vec<usize> = (0..MAX_RETAINED_EQUITY_POINTS)
        .map(|i| ((i as f64 * step).floor() as usize).min(last_idx))
        .collect();
    if *indices.last().unwrap() != last_idx {
        indices.push(last_idx);
    }
    indices.dedup();
    indices.into_iter().map(|i| curve[i]).collect()
}
