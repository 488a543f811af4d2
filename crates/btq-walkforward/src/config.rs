use btq_backtest::BacktestConfig;
use btq_decimal::TradeDate;
use btq_optimize::OptimizationConfig;
use serde::{Deserialize, Serialize};

/// Window-generation strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkForwardMode {
    Rolling,
    Anchored,
}

/// Configuration for a walk-forward validation run, per 's
/// `WalkForwardConfig` entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    pub base_config: BacktestConfig,
    /// Drives each window's in-sample parameter search; its own
    /// `base_config` is ignored — each window substitutes its own
    /// in-sample date range over `base_config` before optimizing.
    pub optimization_config: OptimizationConfig,
    pub analysis_start: TradeDate,
    pub analysis_end: TradeDate,
    pub in_sample_days: i64,
    pub out_of_sample_days: i64,
    pub step_days: i64,
    pub mode: WalkForwardMode,
    pub min_windows: usize,
}

/// Errors raised by [`WalkForwardConfig::validate`], before any window is
/// generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    AnalysisStartAfterEnd { start: TradeDate, end: TradeDate },
    NonPositiveInSampleDays,
    NonPositiveOutOfSampleDays,
    NonPositiveStepDays,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::AnalysisStartAfterEnd { start, end } => {
                write!(f, "analysisStart {start} must be <= analysisEnd {end}")
            }
            ConfigError::NonPositiveInSampleDays => write!(f, "inSampleDays must be > 0"),
            ConfigError::NonPositiveOutOfSampleDays => write!(f, "outOfSampleDays must be > 0"),
            ConfigError::NonPositiveStepDays => write!(f, "stepDays must be > 0"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl WalkForwardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis_start > self.analysis_end {
            return Err(ConfigError::AnalysisStartAfterEnd {
                start: self.analysis_start,
                end: self.analysis_end,
            });
        }
        if self.in_sample_days <= 0 {
            return Err(ConfigError::NonPositiveInSampleDays);
        }
        if self.out_of_sample_days <= 0 {
            return Err(ConfigError::NonPositiveOutOfSampleDays);
        }
        if self.step_days <= 0 {
            return Err(ConfigError::NonPositiveStepDays);
        }
        Ok(())
    }
}
