use btq_backtest::BacktestResult;
use btq_decimal::Money;
use btq_trades::TradeStatus;
use serde::{Deserialize, Serialize};

/// Resampling method applied to the base trade-P&L vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonteCarloMethod {
    Bootstrap,
    BlockBootstrap,
    Permutation,
    Parametric,
}

/// Default starting equity when no base result supplies one.
pub const DEFAULT_INITIAL_CAPITAL: i64 = 10_000_000;

/// Default histogram bin count. The bin count is configurable
/// without naming a default; 20 gives a readable spread for the simulation
/// counts this engine typically runs (hundreds to tens of thousands).
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    NoSimulations,
    ConfidenceLevelOutOfRange,
    NonPositiveBlockSize,
    ZeroHistogramBins,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoSimulations => write!(f, "numSimulations must be >= 1"),
            ConfigError::ConfidenceLevelOutOfRange => write!(f, "confidenceLevel must be in (0, 1)"),
            ConfigError::NonPositiveBlockSize => write!(f, "blockSize must be > 0"),
            ConfigError::ZeroHistogramBins => write!(f, "histogramBins must be >= 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Monte-Carlo resampling configuration, per its `MonteCarloConfig`
/// entity. `base_pnls` and `initial_capital` are the pieces of
/// `baseResult` this simulator actually consumes — see
/// [`MonteCarloConfig::from_backtest_result`] to build one from a full
/// [`BacktestResult`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub base_pnls: Vec<Money>,
    /// `None` defaults to [`DEFAULT_INITIAL_CAPITAL`].
    pub initial_capital: Option<Money>,
    pub method: MonteCarloMethod,
    pub num_simulations: usize,
    pub confidence_level: f64,
    pub block_size: usize,
    pub preserve_correlation: bool,
    pub seed: Option<u64>,
    pub histogram_bins: usize,
}

impl MonteCarloConfig {
    /// Extracts the base P&L vector (closed trades' `net_pnl`, in the
    /// order they appear in the result) and initial capital from a
    /// completed backtest, per its `baseResult` attribute.
    pub fn from_backtest_result(
        result: &BacktestResult,
        method: MonteCarloMethod,
        num_simulations: usize,
        confidence_level: f64,
        block_size: usize,
        preserve_correlation: bool,
        seed: Option<u64>,
    ) -> Self {
        let base_pnls = result
            .trades
            .iter()
            .filter(|t| t.status == TradeStatus::Closed)
            .filter_map(|t| t.net_pnl)
            .collect();
        MonteCarloConfig {
            base_pnls,
            initial_capital: Some(result.config.initial_capital),
            method,
            num_simulations,
            confidence_level,
            block_size,
            preserve_correlation,
            seed,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }

    pub fn effective_initial_capital(&self) -> Money {
        self.initial_capital.unwrap_or(Money::from_i64(DEFAULT_INITIAL_CAPITAL))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_simulations < 1 {
            return Err(ConfigError::NoSimulations);
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ConfigError::ConfidenceLevelOutOfRange);
        }
        if self.block_size == 0 {
            return Err(ConfigError::NonPositiveBlockSize);
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::ZeroHistogramBins);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> MonteCarloConfig {
        MonteCarloConfig {
            base_pnls: vec![Money::parse("100").unwrap(), Money::parse("-50").unwrap()],
            initial_capital: None,
            method: MonteCarloMethod::Bootstrap,
            num_simulations: 1000,
            confidence_level: 0.95,
            block_size: 5,
            preserve_correlation: false,
            seed: Some(42),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn zero_simulations_is_rejected() {
        let mut c = valid();
        c.num_simulations = 0;
        assert_eq!(c.validate().unwrap_err(), ConfigError::NoSimulations);
    }

    #[test]
    fn confidence_level_must_be_open_interval() {
        let mut c = valid();
        c.confidence_level = 1.0;
        assert_eq!(c.validate().unwrap_err(), ConfigError::ConfidenceLevelOutOfRange);
    }

    #[test]
    fn default_initial_capital_applies_when_absent() {
        let c = valid();
        assert_eq!(c.effective_initial_capital(), Money::from_i64(DEFAULT_INITIAL_CAPITAL));
    }
}
