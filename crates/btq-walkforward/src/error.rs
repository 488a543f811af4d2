use crate::config::ConfigError;

/// Errors that abort a walk-forward run before or during its window loop.
#[derive(Debug)]
pub enum WalkForwardError {
    ConfigInvalid(ConfigError),
    BaseConfigInvalid(btq_backtest::ConfigError),
    ///  `WalkForwardInsufficientWindows`: fewer windows were generated
    /// than `minWindows` requires. Fails before any window is optimized.
    InsufficientWindows { generated: usize, min_windows: usize },
    /// Every window's in-sample optimization failed; there is nothing to
    /// aggregate. Not a named error kind on its own, mirroring
    /// `btq-optimize`'s `NoSuccessfulRuns`.
    NoSuccessfulWindows,
}

impl std::fmt::Display for WalkForwardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalkForwardError::ConfigInvalid(e) => write!(f, "walk-forward config invalid: {e}"),
            WalkForwardError::BaseConfigInvalid(e) => write!(f, "base backtest config invalid: {e}"),
            WalkForwardError::InsufficientWindows { generated, min_windows } => write!(
                f,
                "generated {generated} windows, fewer than minWindows {min_windows}"
            ),
            WalkForwardError::NoSuccessfulWindows => write!(f, "no window completed successfully"),
        }
    }
}

impl std::error::Error for WalkForwardError {}

impl From<ConfigError> for WalkForwardError {
    fn from(e: ConfigError) -> Self {
        WalkForwardError::ConfigInvalid(e)
    }
}

impl From<btq_backtest::ConfigError> for WalkForwardError {
    fn from(e: btq_backtest::ConfigError) -> Self {
        WalkForwardError::BaseConfigInvalid(e)
    }
}
