use crate::config::ConfigError;
use btq_replay::ReplayError;
use btq_strategy::{StrategyFactoryError, StrategyHostError};

/// Errors that abort a backtest run before or during `run()`.
///
/// `DataUnavailable` (zero bars loaded) is deliberately *not* a variant
/// here: it is a warn-and-proceed condition that still
/// yields a (zero-trade) `BacktestResult`, not a failure.
#[derive(Debug)]
pub enum BacktestError {
    ///  `ConfigInvalid`: fails fast, before any run record is persisted
    /// beyond a not-started status.
    ConfigInvalid(ConfigError),
    /// The bar repository itself failed to materialize data (an I/O-level
    /// failure, distinct from the zero-bars-is-fine `DataUnavailable` case).
    Replay(ReplayError),
    StrategyFactory(StrategyFactoryError),
    StrategyHost(StrategyHostError),
    ///  `Cancelled`: the cooperative cancel flag was observed between
    /// bars. No partial `BacktestResult` is returned.
    Cancelled,
}

impl std::fmt::Display for BacktestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BacktestError::ConfigInvalid(e) => write!(f, "config invalid: {e}"),
            BacktestError::Replay(e) => write!(f, "replay error: {e}"),
            BacktestError::StrategyFactory(e) => write!(f, "strategy factory error: {e}"),
            BacktestError::StrategyHost(e) => write!(f, "strategy host error: {e}"),
            BacktestError::Cancelled => write!(f, "run was cancelled"),
        }
    }
}

impl std::error::Error for BacktestError {}

impl From<ConfigError> for BacktestError {
    fn from(e: ConfigError) -> Self {
        BacktestError::ConfigInvalid(e)
    }
}

impl From<ReplayError> for BacktestError {
    fn from(e: ReplayError) -> Self {
        BacktestError::Replay(e)
    }
}

impl From<StrategyFactoryError> for BacktestError {
    fn from(e: StrategyFactoryError) -> Self {
        BacktestError::StrategyFactory(e)
    }
}

impl From<StrategyHostError> for BacktestError {
    fn from(e: StrategyHostError) -> Self {
        BacktestError::StrategyHost(e)
    }
}
