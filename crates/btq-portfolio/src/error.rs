use crate::config::{ConfigError, WeightsError};

/// Errors that abort a portfolio run before or during its per-symbol
/// backtest loop.
#[derive(Debug)]
pub enum PortfolioError {
    ConfigInvalid(ConfigError),
    ///  `PortfolioWeightsInvalid`: structural, fails before any child
    /// run — unlike a per-symbol backtest failure, which is logged and
    /// skipped.
    WeightsInvalid(WeightsError),
    /// Every symbol's backtest failed; there is nothing to aggregate.
    NoSuccessfulSymbolRuns,
}

impl std::fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortfolioError::ConfigInvalid(e) => write!(f, "portfolio config invalid: {e}"),
            PortfolioError::WeightsInvalid(e) => write!(f, "portfolio weights invalid: {e}"),
            PortfolioError::NoSuccessfulSymbolRuns => write!(f, "no symbol backtest completed successfully"),
        }
    }
}

impl std::error::Error for PortfolioError {}

impl From<ConfigError> for PortfolioError {
    fn from(e: ConfigError) -> Self {
        PortfolioError::ConfigInvalid(e)
    }
}

impl From<WeightsError> for PortfolioError {
    fn from(e: WeightsError) -> Self {
        PortfolioError::WeightsInvalid(e)
    }
}
