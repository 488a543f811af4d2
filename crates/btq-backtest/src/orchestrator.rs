use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use btq_analytics::{analyze, total_return_percent};
use btq_broker::{Order, OrderKind, OrderSide, VirtualBroker};
use btq_decimal::{end_of_day, start_of_day};
use btq_ids::IdGenerator;
use btq_market::BarWindow;
use btq_replay::{BarRepository, DataReplay, ReplayConfig};
use btq_strategy::{Decision, Signal, SignalType, StrategyContext, StrategyFactory, StrategyHost};
use btq_trades::{MatcherFill, TradeMatcher, TradeMatcherConfig};
use rust_decimal::Decimal;

use crate::config::BacktestConfig;
use crate::error::BacktestError;
use crate::progress::{Progress, ProgressEmitter};
use crate::repository::{RunCompletion, RunRecord, RunRepository, RunStatus};
use crate::result::BacktestResult;

/// Quantity used for an order when a `Decision::target_value` is absent.
const DEFAULT_ORDER_QTY: i64 = 10;

/// The minimum number of bars in a symbol's window before a strategy is
/// invoked, per its `BarWindow` invariant ("length >= 21 before strategy
/// is invoked").
const MIN_LOOKBACK: usize = 21;

/// Bar window capacity.
const WINDOW_CAPACITY: usize = 100;

/// Drives replay → strategy → broker → trade-matcher → analytics for one
/// `BacktestConfig`. Holds no run-scoped mutable state itself —
/// a fresh `VirtualBroker`, `TradeMatcher`, and set of per-symbol
/// `BarWindow`s are created inside `run_with_progress` for each call, so
/// one `BacktestOrchestrator` can drive any number of sequential runs
/// (the optimizer and walk-forward analyzer both do exactly this).
pub struct BacktestOrchestrator<'a> {
    bar_repository: &'a dyn BarRepository,
    strategy_factory: &'a dyn StrategyFactory,
    id_generator: &'a dyn IdGenerator,
    run_repository: &'a dyn RunRepository,
}

impl<'a> BacktestOrchestrator<'a> {
    pub fn new(
        bar_repository: &'a dyn BarRepository,
        strategy_factory: &'a dyn StrategyFactory,
        id_generator: &'a dyn IdGenerator,
        run_repository: &'a dyn RunRepository,
    ) -> Self {
        Self {
            bar_repository,
            strategy_factory,
            id_generator,
            run_repository,
        }
    }

    pub fn run(&self, config: BacktestConfig) -> Result<BacktestResult, BacktestError> {
        self.run_with_progress(config, &mut |_| {}, None)
    }

    /// `run` plus progress checkpoints and cooperative cancellation.
    /// `cancel`, when supplied, is polled between bars; once set, the run
    /// aborts with `BacktestError::Cancelled` and no `BacktestResult` is
    /// returned.
    pub fn run_with_progress(
        &self,
        config: BacktestConfig,
        on_progress: &mut dyn FnMut(Progress),
        cancel: Option<&AtomicBool>,
    ) -> Result<BacktestResult, BacktestError> {
        config.validate()?;

        self.run_repository.save_run(&RunRecord {
            id: config.id.clone(),
            strategy_id: config.strategy_id.clone(),
            start_date: config.start_date,
            end_date: config.end_date,
            symbols_csv: config.symbols.join(","),
            timeframe: config.timeframe.as_str().to_string(),
            initial_capital: config.initial_capital,
            commission_rate: config.commission_rate,
            slippage_rate: config.slippage_rate,
            status: RunStatus::Running,
        });

        match self.run_inner(&config, on_progress, cancel) {
            Ok(result) => {
                self.run_repository.update_run(
                    &config.id,
                    &RunCompletion {
                        final_capital: result.final_capital,
                        total_return_percent: result.total_return_percent,
                        total_trades: result.performance.trade_stats.total_trades,
                        winning_trades: result.performance.trade_stats.winning_trades,
                        losing_trades: result.performance.trade_stats.losing_trades,
                    },
                );
                self.run_repository.save_trades(&config.id, &result.trades);
                Ok(result)
            }
            Err(BacktestError::Cancelled) => Err(BacktestError::Cancelled),
            Err(e) => {
                self.run_repository.fail_run(&config.id, &e.to_string());
                Err(e)
            }
        }
    }

    fn run_inner(
        &self,
        config: &BacktestConfig,
        on_progress: &mut dyn FnMut(Progress),
        cancel: Option<&AtomicBool>,
    ) -> Result<BacktestResult, BacktestError> {
        ProgressEmitter::new(0).loading(on_progress);

        let replay_config = ReplayConfig {
            symbols: config.symbols.clone(),
            timeframe: config.timeframe.clone(),
            start_date: config.start_date,
            end_date: config.end_date,
        };
        let mut replay = DataReplay::load_data(&replay_config, self.bar_repository)?;

        if replay.total_bars() == 0 {
            tracing::warn!(run_id = %config.id, "replay loaded zero bars; run proceeds with a zero-trade result");
        }

        let mut emitter = ProgressEmitter::new(replay.total_bars());
        emitter.loaded(on_progress);

        let mut broker = VirtualBroker::new(config.initial_capital);
        broker.set_commission(config.commission_rate);
        broker.set_slippage(config.slippage_rate);

        let mut matcher = TradeMatcher::new(TradeMatcherConfig::strict(
            config.commission_rate,
            config.slippage_rate,
        ));

        let strategy = self.strategy_factory.create(config.strategy_type.as_deref())?;
        let host = StrategyHost::new(strategy, config.timeframe.as_str(), config.timeframe.as_str())?;

        let mut windows: BTreeMap<String, BarWindow> = BTreeMap::new();
        let mut signals = Vec::new();
        let mut orders = Vec::new();
        let mut fills = Vec::new();
        let mut trades = Vec::new();

        let mut processed = 0usize;
        while replay.has_next() {
            if let Some(flag) = cancel {
                if flag.load(Ordering::SeqCst) {
                    return Err(BacktestError::Cancelled);
                }
            }

            let bar = replay.next()?.clone();

            let window = windows
                .entry(bar.symbol.clone())
                .or_insert_with(|| BarWindow::new(WINDOW_CAPACITY));
            window.push(bar.clone());

            if window.len() >= MIN_LOOKBACK {
                let context = StrategyContext {
                    strategy_id: config.strategy_id.clone(),
                    symbol: bar.symbol.clone(),
                    account_tag: config.account_tag.clone(),
                    bars: window.snapshot(),
                    params: config.strategy_params.clone(),
                    timeframe: config.timeframe.clone(),
                };
                let decision: Decision = host.evaluate(&context);

                if decision.is_actionable() {
                    let signal = Signal {
                        id: self.id_generator.next_id().to_string(),
                        strategy_id: config.strategy_id.clone(),
                        symbol: bar.symbol.clone(),
                        signal_type: decision.signal_type,
                        target_value: decision.target_value,
                        reason: decision.reason.clone(),
                        ttl_seconds: decision.ttl_seconds,
                    };

                    let side = match decision.signal_type {
                        SignalType::Buy => OrderSide::Buy,
                        SignalType::Sell => OrderSide::Sell,
                        SignalType::Hold => unreachable!("is_actionable excludes Hold"),
                    };
                    let qty = decision
                        .target_value
                        .unwrap_or_else(|| Decimal::from(DEFAULT_ORDER_QTY));

                    let order = Order {
                        id: self.id_generator.next_id().to_string(),
                        symbol: bar.symbol.clone(),
                        side,
                        kind: OrderKind::Market,
                        qty,
                        limit_price: None,
                        bookkeeping_price: bar.close,
                    };

                    broker.submit(order.clone());
                    signals.push(signal);
                    orders.push(order);
                }
            }

            for fill in broker.process_bar(&bar) {
                let matcher_fill = MatcherFill {
                    order_id: fill.order_id.clone(),
                    symbol: fill.symbol.clone(),
                    side: fill.side,
                    price: fill.price,
                    qty: fill.qty,
                    timestamp: bar.timestamp,
                };
                match matcher.on_fill(&matcher_fill, || self.id_generator.next_id().to_string()) {
                    Ok(Some(trade)) => trades.push(trade),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(symbol = %bar.symbol, error = %e, "trade matcher rejected fill");
                    }
                }
                fills.push(fill);
            }

            processed += 1;
            emitter.on_bar(processed, on_progress);
        }

        emitter.finalizing(on_progress);

        let start_wall = start_of_day(config.start_date);
        let end_wall = end_of_day(config.end_date);
        let final_capital = broker.cash_balance();
        let total_return = total_return_percent(config.initial_capital, final_capital);
        let performance = analyze(start_wall, end_wall, config.initial_capital, final_capital, &trades);

        emitter.done(on_progress);

        Ok(BacktestResult {
            config: config.clone(),
            status: RunStatus::Completed,
            start_wall,
            end_wall,
            signals,
            orders,
            fills,
            trades,
            final_capital,
            total_return_percent: total_return,
            performance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_decimal::{Money, Timestamp};
    use btq_ids::MonotonicIdGenerator;
    use btq_market::{Bar, Timeframe};
    use btq_replay::ReplayError;
    use btq_strategy::{DefaultStrategyFactory, StrategyParams};
    use chrono::NaiveDate;

    struct FixedBars(Vec<Bar>);

    impl BarRepository for FixedBars {
        fn find_bars(
            &self,
            symbols: &[String],
            timeframe: &str,
            start_ts: Timestamp,
            end_ts: Timestamp,
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

    struct RecordingRepository {
        saved: std::sync::Mutex<Vec<String>>,
    }

    impl RunRepository for RecordingRepository {
        fn save_run(&self, record: &RunRecord) {
            self.saved.lock().unwrap().push(format!("save:{}", record.id));
        }
        fn update_run(&self, run_id: &str, _completion: &RunCompletion) {
            self.saved.lock().unwrap().push(format!("update:{run_id}"));
        }
        fn fail_run(&self, run_id: &str, _reason: &str) {
            self.saved.lock().unwrap().push(format!("fail:{run_id}"));
        }
        fn save_trades(&self, run_id: &str, _trades: &[btq_trades::Trade]) {
            self.saved.lock().unwrap().push(format!("trades:{run_id}"));
        }
    }

    fn bar(symbol: &str, day: u32, open: &str, high: &str, low: &str, close: &str) -> Bar {
        let ts = NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Bar::restore(
            symbol,
            Timeframe::new("1d"),
            ts,
            Money::parse(open).unwrap(),
            Money::parse(high).unwrap(),
            Money::parse(low).unwrap(),
            Money::parse(close).unwrap(),
            Decimal::from(1_000),
            true,
        )
        .unwrap()
    }

    fn config(symbols: Vec<&str>, days: u32) -> BacktestConfig {
        BacktestConfig {
            id: "run-1".into(),
            strategy_id: "strat-1".into(),
            strategy_type: None,
            symbols: symbols.into_iter().map(String::from).collect(),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, days as i32).unwrap(),
            timeframe: Timeframe::new("1d"),
            initial_capital: Money::from_i64(1_000_000),
            commission_rate: Decimal::new(1, 3),
            slippage_rate: Decimal::new(5, 4),
            strategy_params: StrategyParams::new(),
            account_tag: "default".into(),
        }
    }

    #[test]
    fn zero_bars_yields_zero_trade_result() {
        let bars = FixedBars(vec![]);
        let factory = DefaultStrategyFactory;
        let ids = MonotonicIdGenerator::new();
        let repo = RecordingRepository { saved: std::sync::Mutex::new(Vec::new()) };
        let orch = BacktestOrchestrator::new(&bars, &factory, &ids, &repo);

        let result = orch.run(config(vec!["AAPL"], 5)).unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.final_capital, Money::from_i64(1_000_000));
        assert_eq!(result.total_return_percent, Decimal::ZERO);
    }

    #[test]
    fn invalid_config_is_rejected_before_any_persistence() {
        let bars = FixedBars(vec![]);
        let factory = DefaultStrategyFactory;
        let ids = MonotonicIdGenerator::new();
        let repo = RecordingRepository { saved: std::sync::Mutex::new(Vec::new()) };
        let orch = BacktestOrchestrator::new(&bars, &factory, &ids, &repo);

        let mut bad = config(vec!["AAPL"], 5);
        bad.symbols.clear();
        let err = orch.run(bad).unwrap_err();
        assert!(matches!(err, BacktestError::ConfigInvalid(_)));
        assert!(repo.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn cancellation_mid_run_aborts_with_no_result() {
        let bars = FixedBars(
            (1..=60)
                .map(|d| bar("AAPL", d, "100", "110", "95", "105"))
                .collect(),
        );
        let factory = DefaultStrategyFactory;
        let ids = MonotonicIdGenerator::new();
        let repo = RecordingRepository { saved: std::sync::Mutex::new(Vec::new()) };
        let orch = BacktestOrchestrator::new(&bars, &factory, &ids, &repo);

        let cancel = AtomicBool::new(true);
        let err = orch
            .run_with_progress(config(vec!["AAPL"], 60), &mut |_| {}, Some(&cancel))
            .unwrap_err();
        assert!(matches!(err, BacktestError::Cancelled));
    }

    #[test]
    fn progress_checkpoints_reach_100() {
        let bars = FixedBars(
            (1..=30)
                .map(|d| bar("AAPL", d, "100", "110", "95", "105"))
                .collect(),
        );
        let factory = DefaultStrategyFactory;
        let ids = MonotonicIdGenerator::new();
        let repo = RecordingRepository { saved: std::sync::Mutex::new(Vec::new()) };
        let orch = BacktestOrchestrator::new(&bars, &factory, &ids, &repo);

        let mut last = 0.0;
        orch.run_with_progress(config(vec!["AAPL"], 30), &mut |p| last = p.percent, None)
            .unwrap();
        assert_eq!(last, 100.0);
    }
}
