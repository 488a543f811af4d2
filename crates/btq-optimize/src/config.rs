use std::collections::BTreeMap;

use btq_backtest::BacktestConfig;
use serde::{Deserialize, Serialize};

/// Search strategy over `parameter_ranges`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationMethod {
    Grid,
    Random,
}

/// The metric a [`crate::ParameterOptimizer`] maximizes, mapped onto a
/// child run's performance report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    TotalReturn,
    SharpeRatio,
    SortinoRatio,
    ProfitFactor,
    CalmarRatio,
}

/// Configuration for a parameter search, per its `OptimizationConfig`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimizationConfig {
    pub base_config: BacktestConfig,
    /// Candidate values per parameter name; the Cartesian product of these
    /// lists is the combination space `Grid` enumerates (or `Random`
    /// samples from without replacement).
    pub parameter_ranges: BTreeMap<String, Vec<serde_json::Value>>,
    pub method: OptimizationMethod,
    pub objective: Objective,
    pub max_runs: usize,
    /// Seeds the `RANDOM` method's sampling PRNG. `None` falls back to a
    /// fixed default seed rather than OS randomness, so a caller who wants
    /// genuine nondeterminism must supply one explicitly (only the CLI's
    /// seed-from-wall-time fallback is allowed to do that, per the ambient
    /// randomness policy).
    pub seed: Option<u64>,
}

/// Errors raised by [`OptimizationConfig`] validation, before any child
/// run is attempted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    EmptyParameterRanges,
    ZeroMaxRuns,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyParameterRanges => write!(f, "parameterRanges must be non-empty"),
            ConfigError::ZeroMaxRuns => write!(f, "maxRuns must be > 0"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl OptimizationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parameter_ranges.is_empty()
            || self.parameter_ranges.values().any(|values| values.is_empty())
        {
            return Err(ConfigError::EmptyParameterRanges);
        }
        if self.max_runs == 0 {
            return Err(ConfigError::ZeroMaxRuns);
        }
        Ok(())
    }
}
