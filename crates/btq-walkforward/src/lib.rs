//! btq-walkforward
//!
//! Rolling/anchored walk-forward validation : generates in-sample /
//! out-of-sample window pairs, optimizes parameters on each in-sample
//! window via `btq-optimize`, evaluates the winner out-of-sample, and
//! aggregates combined return, average Sharpe, and a stability score.

mod analyzer;
mod config;
mod error;
mod result;
mod windows;

pub use analyzer::WalkForwardAnalyzer;
pub use config::{ConfigError, WalkForwardConfig, WalkForwardMode};
pub use error::WalkForwardError;
pub use result::{WalkForwardResult, WindowResult};
pub use windows::{generate as generate_windows, WindowSpec};
