//! btq-optimize
//!
//! Grid and random parameter search over a base backtest config, per
//! : enumerate combinations, run each as a child backtest, and select
//! the best by the configured objective.

mod combinations;
mod config;
mod error;
mod objective;
mod optimizer;
mod result;

pub use combinations::enumerate;
pub use config::{ConfigError, Objective, OptimizationConfig, OptimizationMethod};
pub use error::OptimizationError;
pub use objective::extract as extract_objective;
pub use optimizer::ParameterOptimizer;
pub use result::{ChildRunSummary, OptimizationResult};
