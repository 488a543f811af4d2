//! btq-portfolio
//!
//! Multi-symbol portfolio backtesting : runs one independent
//! weighted child backtest per symbol, combines their equity curves with
//! optional periodic rebalancing, and aggregates portfolio-level trade
//! statistics, risk metrics, and pairwise return correlation.

mod config;
mod correlation;
mod engine;
mod equity;
mod error;
mod result;

pub use config::{ConfigError, PortfolioConfig, WeightsError};
pub use correlation::CorrelationMatrix;
pub use engine::PortfolioEngine;
pub use error::PortfolioError;
pub use result::{PortfolioResult, SymbolRunResult};
