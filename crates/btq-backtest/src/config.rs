use btq_decimal::{Money, TradeDate};
use btq_market::Timeframe;
use btq_strategy::StrategyParams;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors raised by [`BacktestConfig::validate`]'s precondition
/// list. Each variant names the specific field that failed so a caller
/// surfaces an actionable message rather than a generic "invalid config".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingId,
    MissingStrategyId,
    EmptySymbols,
    StartAfterEnd { start: TradeDate, end: TradeDate },
    NonPositiveInitialCapital,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingId => write!(f, "config id must be non-empty"),
            ConfigError::MissingStrategyId => write!(f, "strategyId must be non-empty"),
            ConfigError::EmptySymbols => write!(f, "symbols must be non-empty"),
            ConfigError::StartAfterEnd { start, end } => {
                write!(f, "startDate {start} must be <= endDate {end}")
            }
            ConfigError::NonPositiveInitialCapital => write!(f, "initialCapital must be > 0"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for a single-symbol-set backtest run, per 's
/// `BacktestConfig` entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub id: String,
    pub strategy_id: String,
    /// `None`/empty resolves to `"MA_CROSSOVER"` via the strategy factory.
    pub strategy_type: Option<String>,
    pub symbols: Vec<String>,
    pub start_date: TradeDate,
    pub end_date: TradeDate,
    pub timeframe: Timeframe,
    pub initial_capital: Money,
    pub commission_rate: Decimal,
    pub slippage_rate: Decimal,
    pub strategy_params: StrategyParams,
    /// Not part of the core `BacktestConfig` fields but required by
    /// `StrategyContext`; defaults to `"default"` for single-account runs.
    pub account_tag: String,
}

impl BacktestConfig {
    ///  `validateConfig`: non-null id/strategyId, `startDate <=
    /// endDate`, non-empty symbols, `initialCapital > 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::MissingId);
        }
        if self.strategy_id.trim().is_empty() {
            return Err(ConfigError::MissingStrategyId);
        }
        if self.symbols.is_empty() {
            return Err(ConfigError::EmptySymbols);
        }
        if self.start_date > self.end_date {
            return Err(ConfigError::StartAfterEnd {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !self.initial_capital.is_positive() {
            return Err(ConfigError::NonPositiveInitialCapital);
        }
        Ok(())
    }
}
