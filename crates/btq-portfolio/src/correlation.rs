use std::collections::BTreeMap;

use btq_analytics::EquityPoint;
use btq_decimal::TradeDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Pairwise Pearson correlation of daily returns across the portfolio's
/// symbols. Rows/columns follow `symbols`' order; the diagonal
/// is always `1.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.values[i][j])
    }
}

/// Groups an equity curve by calendar day (keeping the last point seen per
/// day) and returns the day-over-day percent returns in day
/// order. A zero-equity predecessor contributes a `0.0` return rather than
/// dividing by zero — matches `Money::div_ratio`'s "zero divisor -> zero"
/// convention used throughout this workspace.
fn daily_returns(curve: &[EquityPoint]) -> Vec<f64> {
    let mut by_day: BTreeMap<TradeDate, Decimal> = BTreeMap::new();
    for point in curve {
        by_day.insert(point.timestamp.date(), point.equity.raw());
    }
    let values: Vec<Decimal> = by_day.into_values().collect();

    values
        .windows(2)
        .map(|w| {
            let (prev, cur) = (w[0], w[1]);
            if prev.is_zero() {
                0.0
            } else {
                ((cur - prev) / prev * Decimal::from(100)).to_f64().unwrap_or(0.0)
            }
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Pearson correlation over the common prefix length of `x` and `y`
/// (: "pairwise Pearson over the common prefix length, min of the two
/// series"). `0.0` if either series has zero variance.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mx = mean(x);
    let my = mean(y);

    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    if vx == 0.0 || vy == 0.0 {
        return 0.0;
    }
    (cov / (vx.sqrt() * vy.sqrt())).clamp(-1.0, 1.0)
}

/// Builds the full correlation matrix for `curves`, keyed by symbol in
/// `symbols`' order. `symbols` is expected to already be sorted ascending
/// (the caller's `BTreeMap<String, _>` iteration order).
pub fn build_matrix(symbols: &[String], curves: &BTreeMap<String, Vec<EquityPoint>>) -> CorrelationMatrix {
    let returns: Vec<Vec<f64>> = symbols
        .iter()
        .map(|s| daily_returns(curves.get(s).map(|c| c.as_slice()).unwrap_or(&[])))
        .collect();

    let n = symbols.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            values[i][j] = if i == j { 1.0 } else { pearson(&returns[i], &returns[j]) };
        }
    }

    CorrelationMatrix {
        symbols: symbols.to_vec(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_decimal::Money;
    use chrono::NaiveDate;

    fn point(day: u32, equity: &str) -> EquityPoint {
        EquityPoint {
            timestamp: NaiveDate::from_ymd_opt(2023, 1, day).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            equity: Money::parse(equity).unwrap(),
        }
    }

    #[test]
    fn identical_series_correlate_perfectly() {
        let curve = vec![point(1, "1000"), point(2, "1100"), point(3, "1210")];
        let mut curves = BTreeMap::new();
        curves.insert("AAPL".to_string(), curve.clone());
        curves.insert("MSFT".to_string(), curve);
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let matrix = build_matrix(&symbols, &curves);
        assert!((matrix.get("AAPL", "MSFT").unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(matrix.get("AAPL", "AAPL").unwrap(), 1.0);
    }

    #[test]
    fn flat_series_has_zero_correlation() {
        let flat = vec![point(1, "1000"), point(2, "1000"), point(3, "1000")];
        let moving = vec![point(1, "1000"), point(2, "1100"), point(3, "1210")];
        let mut curves = BTreeMap::new();
        curves.insert("AAPL".to_string(), flat);
        curves.insert("MSFT".to_string(), moving);
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let matrix = build_matrix(&symbols, &curves);
        assert_eq!(matrix.get("AAPL", "MSFT").unwrap(), 0.0);
    }

    #[test]
    fn inversely_moving_series_correlate_negatively() {
        let up = vec![point(1, "1000"), point(2, "1100"), point(3, "1210")];
        let down = vec![point(1, "1000"), point(2, "900"), point(3, "810")];
        let mut curves = BTreeMap::new();
        curves.insert("AAPL".to_string(), up);
        curves.insert("MSFT".to_string(), down);
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let matrix = build_matrix(&symbols, &curves);
        assert!(matrix.get("AAPL", "MSFT").unwrap() < 0.0);
    }
}
