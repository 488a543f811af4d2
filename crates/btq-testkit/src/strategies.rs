use btq_strategy::{Decision, SignalType, Strategy, StrategyContext, StrategyFactory, StrategyFactoryError};
use parking_lot::Mutex;
use rust_decimal::Decimal;

/// A [`Strategy`] that always emits the same [`Decision`], regardless of
/// context — useful for scenario tests that want to drive the broker/trade
/// matcher deterministically without exercising real signal logic.
pub struct FixedDecisionStrategy {
    decision: Decision,
}

impl FixedDecisionStrategy {
    pub fn new(decision: Decision) -> Self {
        Self { decision }
    }

    pub fn always_buy(qty: Decimal) -> Self {
        Self::new(Decision {
            signal_type: SignalType::Buy,
            target_value: Some(qty),
            reason: "test fixture".into(),
            ttl_seconds: 0,
        })
    }

    pub fn always_hold() -> Self {
        Self::new(Decision::hold())
    }
}

impl Strategy for FixedDecisionStrategy {
    fn evaluate(&self, _context: &StrategyContext) -> Decision {
        self.decision.clone()
    }

    fn name(&self) -> &str {
        "FIXED_DECISION"
    }
}

/// A [`Strategy`] driven by a pre-scripted sequence of decisions, one per
/// call to `evaluate` — once exhausted, returns `Decision::hold()`. Lets a
/// scenario test script an exact BUY-then-SELL sequence against a fixed
/// bar stream.
pub struct ScriptedStrategy {
    script: Mutex<Vec<Decision>>,
    cursor: std::sync::atomic::AtomicUsize,
}

impl ScriptedStrategy {
    pub fn new(script: Vec<Decision>) -> Self {
        Self {
            script: Mutex::new(script),
            cursor: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl Strategy for ScriptedStrategy {
    fn evaluate(&self, _context: &StrategyContext) -> Decision {
        let idx = self.cursor.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.script.lock().get(idx).cloned().unwrap_or_else(Decision::hold)
    }

    fn name(&self) -> &str {
        "SCRIPTED"
    }
}

/// A [`StrategyFactory`] that always hands out a fresh `FixedDecisionStrategy`
/// holding, ignoring the requested `strategyType` entirely — for tests that
/// only care about broker/matcher/analytics behavior, not strategy
/// resolution.
pub struct AlwaysHoldStrategyFactory;

impl StrategyFactory for AlwaysHoldStrategyFactory {
    fn create(&self, _strategy_type: Option<&str>) -> Result<Box<dyn Strategy>, StrategyFactoryError> {
        Ok(Box::new(FixedDecisionStrategy::always_hold()))
    }
}
