//! btq-strategy
//!
//! The strategy contract ([`Strategy`]) the orchestrator evaluates each bar
//! against, the [`StrategyHost`] that enforces a strategy's declared
//! timeframe, the [`StrategyFactory`] seam for instantiating strategies by
//! type name, and the built-in `MA_CROSSOVER` default strategy.

mod factory;
mod host;
mod ma_crossover;
mod types;

pub use factory::DefaultStrategyFactory;
pub use host::{Strategy, StrategyFactory, StrategyFactoryError, StrategyHost, StrategyHostError};
pub use ma_crossover::MaCrossoverStrategy;
pub use types::{Decision, Signal, SignalType, StrategyContext, StrategyParams};
