use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::MonteCarloConfig;
use crate::error::MonteCarloError;
use crate::resample::resample;
use crate::simulation::simulate_one;
use crate::stats::{aggregate, MonteCarloResult};

/// Golden-ratio constant used to decorrelate per-simulation seeds derived
/// from one base seed (same technique `MonotonicIdGenerator` avoids; here
/// it keeps each simulation's stream independent while the whole run
/// stays reproducible end-to-end from a single seed, per P9).
const SEED_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

fn base_seed(config: &MonteCarloConfig) -> u64 {
    config.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    })
}

/// Resamples and simulates `config.num_simulations` independent equity
/// paths from `config.base_pnls`. An empty base P&L vector
/// yields the zeroed result, not an error — there is nothing to
/// resample.
pub struct MonteCarloSimulator;

impl MonteCarloSimulator {
    pub fn run(&self, config: &MonteCarloConfig) -> Result<MonteCarloResult, MonteCarloError> {
        config.validate()?;

        if config.base_pnls.is_empty() {
            return Ok(MonteCarloResult::zeroed(config.num_simulations));
        }

        let initial_capital = config.effective_initial_capital();
        let seed = base_seed(config);

        let outcomes = (0..config.num_simulations)
            .into_par_iter()
            .map(|i| {
                let sim_seed = seed ^ (i as u64).wrapping_mul(SEED_SPREAD);
                let mut rng = ChaCha8Rng::seed_from_u64(sim_seed);
                let sampled = resample(config.method, &config.base_pnls, config.block_size, &mut rng);
                simulate_one(initial_capital, &sampled)
            })
            .collect::<Vec<_>>();

        Ok(aggregate(outcomes, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonteCarloMethod;
    use btq_decimal::Money;

    fn config(seed: Option<u64>) -> MonteCarloConfig {
        MonteCarloConfig {
            base_pnls: vec![
                Money::parse("100").unwrap(),
                Money::parse("-50").unwrap(),
                Money::parse("25").unwrap(),
                Money::parse("75").unwrap(),
                Money::parse("-30").unwrap(),
            ],
            initial_capital: Some(Money::from_i64(10_000)),
            method: MonteCarloMethod::Bootstrap,
            num_simulations: 1000,
            confidence_level: 0.95,
            block_size: 2,
            preserve_correlation: false,
            seed,
            histogram_bins: 20,
        }
    }

    #[test]
    fn empty_base_pnls_yields_zeroed_result_not_error() {
        let mut c = config(Some(42));
        c.base_pnls.clear();
        let simulator = MonteCarloSimulator;
        let result = simulator.run(&c).unwrap();
        assert_eq!(result.mean_return_percent, 0.0);
        assert!(result.best_simulation.is_none());
    }

    #[test]
    fn same_seed_yields_byte_equal_aggregate_statistics() {
        let simulator = MonteCarloSimulator;
        let a = simulator.run(&config(Some(42))).unwrap();
        let b = simulator.run(&config(Some(42))).unwrap();
        assert_eq!(a.mean_return_percent, b.mean_return_percent);
        assert_eq!(a.value_at_risk_percent, b.value_at_risk_percent);
        assert_eq!(a.conditional_value_at_risk_percent, b.conditional_value_at_risk_percent);
        assert_eq!(a.return_histogram.counts, b.return_histogram.counts);
    }

    #[test]
    fn mean_return_matches_expected_scenario_value() {
        // S6: basePnls sum to 120, numSimulations=1000, initialCapital=10000
        // => expected mean return within ~1% of 1.2%. Bootstrap resampling
        // preserves the mean of the input in expectation.
        let simulator = MonteCarloSimulator;
        let result = simulator.run(&config(Some(42))).unwrap();
        assert!((result.mean_return_percent - 1.2).abs() < 1.0);
    }
}
