use std::collections::BTreeMap;

use btq_analytics::analyze;
use btq_backtest::{BacktestConfig, BacktestOrchestrator, NullRunRepository};
use btq_ids::IdGenerator;
use btq_replay::BarRepository;
use btq_strategy::StrategyFactory;
use btq_trades::Trade;
use rayon::prelude::*;

use crate::config::PortfolioConfig;
use crate::correlation::build_matrix;
use crate::equity::build_combined_curve;
use crate::error::PortfolioError;
use crate::result::{PortfolioResult, SymbolRunResult};

/// Drives one independent child backtest per symbol and aggregates the
/// results into a single portfolio view. Each symbol's
/// allocation is `initialCapital * weight`; symbols run in parallel 
/// via `rayon` and a failed symbol run is logged and excluded from the
/// aggregate rather than aborting the whole portfolio, unless every symbol
/// fails.
pub struct PortfolioEngine<'a> {
    bar_repository: &'a dyn BarRepository,
    strategy_factory: &'a dyn StrategyFactory,
    id_generator: &'a dyn IdGenerator,
}

impl<'a> PortfolioEngine<'a> {
    pub fn new(
        bar_repository: &'a dyn BarRepository,
        strategy_factory: &'a dyn StrategyFactory,
        id_generator: &'a dyn IdGenerator,
    ) -> Self {
        Self {
            bar_repository,
            strategy_factory,
            id_generator,
        }
    }

    pub fn run(&self, config: &PortfolioConfig) -> Result<PortfolioResult, PortfolioError> {
        config.validate()?;
        config.validate_weights()?;

        let null_repo = NullRunRepository;
        let orchestrator = BacktestOrchestrator::new(
            self.bar_repository,
            self.strategy_factory,
            self.id_generator,
            &null_repo,
        );

        let outcomes: Vec<Option<SymbolRunResult>> = config
            .symbol_weights
            .par_iter()
            .map(|(symbol, weight)| {
                let allocated_capital = config.initial_capital.mul_rate(*weight).round_half_up(0);
                let child_config = BacktestConfig {
                    id: self.id_generator.next_id().to_string(),
                    strategy_id: config.strategy_id.clone(),
                    strategy_type: config.strategy_type.clone(),
                    symbols: vec![symbol.clone()],
                    start_date: config.start_date,
                    end_date: config.end_date,
                    timeframe: config.timeframe.clone(),
                    initial_capital: allocated_capital,
                    commission_rate: config.commission_rate,
                    slippage_rate: config.slippage_rate,
                    strategy_params: config.strategy_params.clone(),
                    account_tag: config.account_tag.clone(),
                };
                match orchestrator.run(child_config) {
                    Ok(result) => Some(SymbolRunResult {
                        symbol: symbol.clone(),
                        weight: *weight,
                        allocated_capital,
                        result,
                    }),
                    Err(e) => {
                        tracing::warn!(symbol = %symbol, error = %e, "portfolio symbol run failed; excluded from aggregate");
                        None
                    }
                }
            })
            .collect();

        let symbol_results: Vec<SymbolRunResult> = outcomes.into_iter().flatten().collect();
        if symbol_results.is_empty() {
            return Err(PortfolioError::NoSuccessfulSymbolRuns);
        }

        let final_capital = symbol_results.iter().map(|r| r.result.final_capital).sum();
        let total_return_percent =
            btq_analytics::total_return_percent(config.initial_capital, final_capital);

        let symbol_curves: BTreeMap<String, Vec<_>> = symbol_results
            .iter()
            .map(|r| (r.symbol.clone(), r.result.performance.equity_curve.clone()))
            .collect();
        let combined_equity_curve =
            build_combined_curve(&symbol_curves, &config.symbol_weights, config.rebalancing_frequency_days);

        let mut trades: Vec<Trade> = symbol_results.iter().flat_map(|r| r.result.trades.clone()).collect();
        trades.sort_by_key(|t| t.exit_time);

        let start_wall = symbol_results
            .iter()
            .map(|r| r.result.start_wall)
            .min()
            .unwrap_or(symbol_results[0].result.start_wall);
        let end_wall = symbol_results
            .iter()
            .map(|r| r.result.end_wall)
            .max()
            .unwrap_or(symbol_results[0].result.end_wall);

        let portfolio_performance = analyze(start_wall, end_wall, config.initial_capital, final_capital, &trades);

        let symbols: Vec<String> = config.symbol_weights.keys().cloned().collect();
        let correlation_matrix = build_matrix(&symbols, &symbol_curves);

        Ok(PortfolioResult {
            config: config.clone(),
            symbol_results,
            final_capital,
            total_return_percent,
            combined_equity_curve,
            portfolio_performance,
            correlation_matrix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_decimal::Money;
    use btq_ids::MonotonicIdGenerator;
    use btq_market::{Bar, Timeframe};
    use btq_replay::ReplayError;
    use btq_strategy::DefaultStrategyFactory;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    struct FixedBars(Vec<Bar>);

    impl BarRepository for FixedBars {
        fn find_bars(
            &self,
            symbols: &[String],
            timeframe: &str,
            start_ts: btq_decimal::Timestamp,
            end_ts: btq_decimal::Timestamp,
        ) -> Result<Vec<Bar>, ReplayError> {
            Ok(self
                .0
                .iter()
                .filter(|b| {
                    symbols.contains(&b.symbol)
                        && b.timeframe.as_str() == timeframe
                        && b.timestamp >= start_ts
                        && b.timestamp <= end_ts
                })
                .cloned()
                .collect())
        }
    }

    fn bar(symbol: &str, day: u32, close: &str) -> Bar {
        let ts = NaiveDate::from_ymd_opt(2023, 1, day).unwrap().and_hms_opt(9, 30, 0).unwrap();
        let c = Money::parse(close).unwrap();
        Bar::restore(symbol, Timeframe::new("1d"), ts, c, c, c, c, Decimal::from(1_000), true).unwrap()
    }

    fn config() -> PortfolioConfig {
        let mut weights = BTreeMap::new();
        weights.insert("AAPL".to_string(), Decimal::new(6, 1));
        weights.insert("MSFT".to_string(), Decimal::new(4, 1));
        PortfolioConfig {
            id: "pf-1".into(),
            strategy_id: "strat-1".into(),
            strategy_type: None,
            symbol_weights: weights,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 2, 10).unwrap(),
            timeframe: Timeframe::new("1d"),
            initial_capital: Money::from_i64(1_000_000),
            commission_rate: Decimal::ZERO,
            slippage_rate: Decimal::ZERO,
            strategy_params: Default::default(),
            account_tag: "default".into(),
            rebalancing_frequency_days: 0,
        }
    }

    #[test]
    fn runs_one_child_backtest_per_symbol() {
        let mut bars = Vec::new();
        for d in 1..=40 {
            bars.push(bar("AAPL", d, "100"));
            bars.push(bar("MSFT", d, "50"));
        }
        let repo = FixedBars(bars);
        let factory = DefaultStrategyFactory;
        let ids = MonotonicIdGenerator::new();
        let engine = PortfolioEngine::new(&repo, &factory, &ids);

        let result = engine.run(&config()).unwrap();
        assert_eq!(result.symbol_results.len(), 2);
        assert_eq!(result.final_capital, Money::from_i64(1_000_000));
        assert!(!result.combined_equity_curve.is_empty());
        assert_eq!(result.correlation_matrix.get("AAPL", "AAPL"), Some(1.0));
    }

    #[test]
    fn weights_not_summing_to_one_is_rejected_before_any_run() {
        let repo = FixedBars(vec![]);
        let factory = DefaultStrategyFactory;
        let ids = MonotonicIdGenerator::new();
        let engine = PortfolioEngine::new(&repo, &factory, &ids);

        let mut c = config();
        c.symbol_weights.insert("GOOG".to_string(), Decimal::new(1, 1));
        assert!(engine.run(&c).is_err());
    }
}
