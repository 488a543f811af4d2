use std::collections::BTreeMap;

use btq_decimal::{Money, TradeDate};
use btq_market::Timeframe;
use btq_strategy::StrategyParams;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors raised by [`PortfolioConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingId,
    MissingStrategyId,
    EmptyWeights,
    StartAfterEnd { start: TradeDate, end: TradeDate },
    NonPositiveInitialCapital,
    NegativeRebalancingFrequency,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingId => write!(f, "config id must be non-empty"),
            ConfigError::MissingStrategyId => write!(f, "strategyId must be non-empty"),
            ConfigError::EmptyWeights => write!(f, "symbolWeights must be non-empty"),
            ConfigError::StartAfterEnd { start, end } => {
                write!(f, "startDate {start} must be <= endDate {end}")
            }
            ConfigError::NonPositiveInitialCapital => write!(f, "initialCapital must be > 0"),
            ConfigError::NegativeRebalancingFrequency => {
                write!(f, "rebalancingFrequencyDays must be >= 0")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Σweights ≠ 1 exactly, per its `PortfolioConfig` invariant and 's
/// `PortfolioWeightsInvalid` — checked separately from [`ConfigError`]
/// because it is a distinct named error kind, not a field-level violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightsError {
    pub sum: Decimal,
}

impl std::fmt::Display for WeightsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "symbolWeights must sum to exactly 1, got {}", self.sum)
    }
}

impl std::error::Error for WeightsError {}

/// Configuration for a multi-symbol portfolio backtest, per 's
/// `PortfolioConfig` entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortfolioConfig {
    pub id: String,
    pub strategy_id: String,
    pub strategy_type: Option<String>,
    pub symbol_weights: BTreeMap<String, Decimal>,
    pub start_date: TradeDate,
    pub end_date: TradeDate,
    pub timeframe: Timeframe,
    pub initial_capital: Money,
    pub commission_rate: Decimal,
    pub slippage_rate: Decimal,
    pub strategy_params: StrategyParams,
    pub account_tag: String,
    /// `0` disables rebalancing — the combined equity curve is returned
    /// unmodified.
    pub rebalancing_frequency_days: i64,
}

impl PortfolioConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::MissingId);
        }
        if self.strategy_id.trim().is_empty() {
            return Err(ConfigError::MissingStrategyId);
        }
        if self.symbol_weights.is_empty() {
            return Err(ConfigError::EmptyWeights);
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
        if self.rebalancing_frequency_days < 0 {
            return Err(ConfigError::NegativeRebalancingFrequency);
        }
        Ok(())
    }

    /// //P8: weights must sum to *exactly* 1, checked before any child
    /// backtest runs.
    pub fn validate_weights(&self) -> Result<(), WeightsError> {
        let sum: Decimal = self.symbol_weights.values().copied().sum();
        if sum != Decimal::ONE {
            return Err(WeightsError { sum });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn valid() -> PortfolioConfig {
        let mut weights = BTreeMap::new();
        weights.insert("AAPL".to_string(), Decimal::new(6, 1));
        weights.insert("MSFT".to_string(), Decimal::new(4, 1));
        PortfolioConfig {
            id: "pf-1".into(),
            strategy_id: "strat-1".into(),
            strategy_type: None,
            symbol_weights: weights,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            timeframe: Timeframe::new("1d"),
            initial_capital: Money::from_i64(1_000_000),
            commission_rate: Decimal::new(1, 3),
            slippage_rate: Decimal::new(5, 4),
            strategy_params: StrategyParams::new(),
            account_tag: "default".into(),
            rebalancing_frequency_days: 0,
        }
    }

    #[test]
    fn valid_config_and_weights_pass() {
        let c = valid();
        assert!(c.validate().is_ok());
        assert!(c.validate_weights().is_ok());
    }

    #[test]
    fn weights_not_summing_to_one_is_rejected() {
        let mut c = valid();
        c.symbol_weights.insert("GOOG".to_string(), Decimal::new(1, 1));
        let err = c.validate_weights().unwrap_err();
        assert_eq!(err.sum, Decimal::new(11, 1));
    }

    #[test]
    fn empty_weights_is_rejected() {
        let mut c = valid();
        c.symbol_weights.clear();
        assert_eq!(c.validate().unwrap_err(), ConfigError::EmptyWeights);
    }
}
