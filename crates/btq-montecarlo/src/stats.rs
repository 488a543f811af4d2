use serde::{Deserialize, Serialize};

use crate::config::MonteCarloConfig;
use crate::simulation::SimulationOutcome;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReturnPercentiles {
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPercentiles {
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bin_edges.len() == counts.len() + 1`.
    pub bin_edges: Vec<f64>,
    pub counts: Vec<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// The full aggregate view over all simulations' returns and drawdowns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub num_simulations: usize,
    pub mean_return_percent: f64,
    pub median_return_percent: f64,
    pub std_dev_return_percent: f64,
    pub min_return_percent: f64,
    pub max_return_percent: f64,
    pub value_at_risk_percent: f64,
    pub conditional_value_at_risk_percent: f64,
    pub probability_of_profit: f64,
    pub probability_return_at_least_mean: f64,
    pub probability_of_large_loss: f64,
    pub return_percentiles: ReturnPercentiles,
    pub drawdown_percentiles: DrawdownPercentiles,
    pub return_histogram: Histogram,
    pub confidence_interval_95: ConfidenceInterval,
    pub confidence_interval_99: ConfidenceInterval,
    pub best_simulation: Option<SimulationOutcome>,
    pub worst_simulation: Option<SimulationOutcome>,
    pub median_simulation: Option<SimulationOutcome>,
}

impl MonteCarloResult {
    /// The zeroed result returned for an empty base trade stream  —
    /// not an error.
    pub fn zeroed(num_simulations: usize) -> Self {
        MonteCarloResult {
            num_simulations,
            mean_return_percent: 0.0,
            median_return_percent: 0.0,
            std_dev_return_percent: 0.0,
            min_return_percent: 0.0,
            max_return_percent: 0.0,
            value_at_risk_percent: 0.0,
            conditional_value_at_risk_percent: 0.0,
            probability_of_profit: 0.0,
            probability_return_at_least_mean: 0.0,
            probability_of_large_loss: 0.0,
            return_percentiles: ReturnPercentiles { p5: 0.0, p10: 0.0, p25: 0.0, p50: 0.0, p75: 0.0, p90: 0.0, p95: 0.0 },
            drawdown_percentiles: DrawdownPercentiles { p50: 0.0, p75: 0.0, p90: 0.0, p95: 0.0 },
            return_histogram: Histogram { bin_edges: Vec::new(), counts: Vec::new() },
            confidence_interval_95: ConfidenceInterval { lower: 0.0, upper: 0.0 },
            confidence_interval_99: ConfidenceInterval { lower: 0.0, upper: 0.0 },
            best_simulation: None,
            worst_simulation: None,
            median_simulation: None,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn std_dev(values: &[f64], mu: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// its percentile convention: `floor(N * p/100)`, clamped to the last
/// valid index. The same rule the VaR index uses (`floor(N*(1-conf))`).
fn percentile(sorted_ascending: &[f64], p: f64) -> f64 {
    if sorted_ascending.is_empty() {
        return 0.0;
    }
    let n = sorted_ascending.len();
    let idx = ((n as f64) * (p / 100.0)).floor() as usize;
    sorted_ascending[idx.min(n - 1)]
}

/// Builds an equal-width histogram over `[min, max]` with `bins` buckets;
/// the last bin is closed on the right.
fn histogram(values: &[f64], bins: usize) -> Histogram {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if values.is_empty() || !min.is_finite() || !max.is_finite() {
        return Histogram { bin_edges: Vec::new(), counts: Vec::new() };
    }

    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };
    let bin_edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];

    for &v in values {
        let raw_idx = if max > min { ((v - min) / width).floor() as isize } else { 0 };
        let idx = raw_idx.clamp(0, bins as isize - 1) as usize;
        counts[idx] += 1;
    }

    Histogram { bin_edges, counts }
}

/// Aggregates per-simulation outcomes into the full [`MonteCarloResult`].
pub fn aggregate(outcomes: Vec<SimulationOutcome>, config: &MonteCarloConfig) -> MonteCarloResult {
    let n = outcomes.len();
    let returns: Vec<f64> = outcomes.iter().map(|o| o.total_return_percent).collect();
    let mut drawdowns: Vec<f64> = outcomes.iter().map(|o| o.max_drawdown_percent).collect();

    let mean_return_percent = mean(&returns);
    let std_dev_return_percent = std_dev(&returns, mean_return_percent);

    let mut sorted_returns = returns.clone();
    sorted_returns.sort_by(|a, b| a.partial_cmp(b).unwrap());
    drawdowns.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let median_return_percent = percentile(&sorted_returns, 50.0);
    let min_return_percent = *sorted_returns.first().unwrap_or(&0.0);
    let max_return_percent = *sorted_returns.last().unwrap_or(&0.0);

    let var_idx = ((n as f64) * (1.0 - config.confidence_level)).floor() as usize;
    let var_idx = var_idx.min(n.saturating_sub(1));
    let value_at_risk_percent = sorted_returns.get(var_idx).copied().unwrap_or(0.0);
    let conditional_value_at_risk_percent = if var_idx == 0 {
        sorted_returns.first().copied().unwrap_or(0.0)
    } else {
        mean(&sorted_returns[0..=var_idx])
    };

    let probability_of_profit = returns.iter().filter(|r| **r > 0.0).count() as f64 / n as f64;
    let probability_return_at_least_mean = returns.iter().filter(|r| **r >= mean_return_percent).count() as f64 / n as f64;
    let probability_of_large_loss = returns.iter().filter(|r| **r < -50.0).count() as f64 / n as f64;

    let return_percentiles = ReturnPercentiles {
        p5: percentile(&sorted_returns, 5.0),
        p10: percentile(&sorted_returns, 10.0),
        p25: percentile(&sorted_returns, 25.0),
        p50: percentile(&sorted_returns, 50.0),
        p75: percentile(&sorted_returns, 75.0),
        p90: percentile(&sorted_returns, 90.0),
        p95: percentile(&sorted_returns, 95.0),
    };
    let drawdown_percentiles = DrawdownPercentiles {
        p50: percentile(&drawdowns, 50.0),
        p75: percentile(&drawdowns, 75.0),
        p90: percentile(&drawdowns, 90.0),
        p95: percentile(&drawdowns, 95.0),
    };

    let return_histogram = histogram(&returns, config.histogram_bins);

    let confidence_interval_95 = ConfidenceInterval {
        lower: percentile(&sorted_returns, 2.5),
        upper: percentile(&sorted_returns, 97.5),
    };
    let confidence_interval_99 = ConfidenceInterval {
        lower: percentile(&sorted_returns, 0.5),
        upper: percentile(&sorted_returns, 99.5),
    };

    // best/worst by totalReturn; median by sorted index N/2, .
    let mut by_return: Vec<(usize, f64)> = returns.iter().copied().enumerate().collect();
    by_return.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    let worst_idx = by_return.first().map(|(i, _)| *i);
    let best_idx = by_return.last().map(|(i, _)| *i);
    let median_idx = by_return.get(n / 2).map(|(i, _)| *i);

    let best_simulation = best_idx.map(|i| outcomes[i].clone());
    let worst_simulation = worst_idx.map(|i| outcomes[i].clone());
    let median_simulation = median_idx.map(|i| outcomes[i].clone());

    MonteCarloResult {
        num_simulations: n,
        mean_return_percent,
        median_return_percent,
        std_dev_return_percent,
        min_return_percent,
        max_return_percent,
        value_at_risk_percent,
        conditional_value_at_risk_percent,
        probability_of_profit,
        probability_return_at_least_mean,
        probability_of_large_loss,
        return_percentiles,
        drawdown_percentiles,
        return_histogram,
        confidence_interval_95,
        confidence_interval_99,
        best_simulation,
        worst_simulation,
        median_simulation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_decimal::Money;

    fn outcome(ret: f64, dd: f64) -> SimulationOutcome {
        SimulationOutcome {
            total_return_percent: ret,
            max_drawdown_percent: dd,
            equity_curve: vec![Money::ZERO],
        }
    }

    fn config() -> MonteCarloConfig {
        use crate::config::MonteCarloMethod;
        MonteCarloConfig {
            base_pnls: vec![],
            initial_capital: None,
            method: MonteCarloMethod::Bootstrap,
            num_simulations: 5,
            confidence_level: 0.95,
            block_size: 1,
            preserve_correlation: false,
            seed: Some(1),
            histogram_bins: 5,
        }
    }

    #[test]
    fn mean_and_median_of_simple_returns() {
        let outcomes = vec![outcome(1.0, 0.0), outcome(2.0, 0.0), outcome(3.0, 0.0), outcome(4.0, 0.0), outcome(5.0, 0.0)];
        let result = aggregate(outcomes, &config());
        assert_eq!(result.mean_return_percent, 3.0);
        assert_eq!(result.min_return_percent, 1.0);
        assert_eq!(result.max_return_percent, 5.0);
    }

    #[test]
    fn probability_of_profit_counts_positive_returns() {
        let outcomes = vec![outcome(10.0, 0.0), outcome(-5.0, 0.0), outcome(3.0, 0.0), outcome(-1.0, 0.0)];
        let mut c = config();
        c.num_simulations = 4;
        let result = aggregate(outcomes, &c);
        assert_eq!(result.probability_of_profit, 0.5);
    }

    #[test]
    fn best_worst_and_median_simulations_are_identified() {
        let outcomes = vec![outcome(-10.0, 2.0), outcome(0.0, 1.0), outcome(10.0, 3.0)];
        let mut c = config();
        c.num_simulations = 3;
        let result = aggregate(outcomes, &c);
        assert_eq!(result.best_simulation.unwrap().total_return_percent, 10.0);
        assert_eq!(result.worst_simulation.unwrap().total_return_percent, -10.0);
    }
}
