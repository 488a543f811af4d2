use std::collections::BTreeMap;

use btq_analytics::{EquityPoint, PerformanceReport};
use btq_backtest::BacktestResult;
use btq_decimal::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PortfolioConfig;
use crate::correlation::CorrelationMatrix;

/// The outcome of one symbol's independent child backtest within a
/// portfolio run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymbolRunResult {
    pub symbol: String,
    pub weight: Decimal,
    pub allocated_capital: Money,
    pub result: BacktestResult,
}

/// The full outcome of a multi-symbol portfolio backtest, per 's
/// `PortfolioResult` entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortfolioResult {
    pub config: PortfolioConfig,
    pub symbol_results: Vec<SymbolRunResult>,
    pub final_capital: Money,
    pub total_return_percent: Decimal,
    pub combined_equity_curve: Vec<EquityPoint>,
    /// Trade statistics and risk metrics computed over the union of every
    /// symbol's closed trades, sorted by exit time.
    pub portfolio_performance: PerformanceReport,
    pub correlation_matrix: CorrelationMatrix,
}

impl PortfolioResult {
    /// Convenience lookup, keyed by symbol.
    pub fn by_symbol(&self) -> BTreeMap<&str, &SymbolRunResult> {
        self.symbol_results.iter().map(|r| (r.symbol.as_str(), r)).collect()
    }
}
