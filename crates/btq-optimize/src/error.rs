use crate::config::ConfigError;

/// Errors that abort a parameter search before or during `run()`.
#[derive(Debug)]
pub enum OptimizationError {
    ConfigInvalid(ConfigError),
    /// `GRID` enumerated more combinations than `max_runs` allows. Fails
    /// before any child run.
    Overflow { combinations: usize, max_runs: usize },
    /// Every child run failed or produced an invalid config; there is no
    /// best combination to report. Individual child-run failures are
    /// otherwise logged and skipped rather than treated as a top-level
    /// failure, but an optimizer with zero usable results has nothing to
    /// return.
    NoSuccessfulRuns,
}

impl std::fmt::Display for OptimizationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizationError::ConfigInvalid(e) => write!(f, "optimization config invalid: {e}"),
            OptimizationError::Overflow { combinations, max_runs } => write!(
                f,
                "grid search would run {combinations} combinations, exceeding maxRuns {max_runs}"
            ),
            OptimizationError::NoSuccessfulRuns => write!(f, "no child run completed successfully"),
        }
    }
}

impl std::error::Error for OptimizationError {}

impl From<ConfigError> for OptimizationError {
    fn from(e: ConfigError) -> Self {
        OptimizationError::ConfigInvalid(e)
    }
}
