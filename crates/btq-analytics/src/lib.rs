//! btq-analytics
//!
//! Performance and risk analytics, plus the equity curve builder they
//! both depend on. Pure functions over a closed trade stream —
//! no dependency on the orchestrator, the broker, or any I/O.

mod equity_curve;
mod performance;
mod risk;
mod trade_stats;

pub use equity_curve::{build_equity_curve, EquityPoint};
pub use performance::{analyze, total_return_percent, PerformanceReport};
pub use risk::{compute_risk_metrics, recovery_factor, RiskMetrics, DEFAULT_VAR_CONFIDENCE, RISK_FREE_RATE_PERCENT};
pub use trade_stats::{compute_trade_statistics, TradeStatistics};
