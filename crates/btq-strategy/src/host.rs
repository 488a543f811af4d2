use crate::types::{Decision, StrategyContext};

/// The strategy contract: `evaluate(context) -> decision`.
///
/// Strategies must be pure functions of the supplied [`StrategyContext`] —
/// no I/O, no reaching outside the window for additional bars, no mutation
/// visible across calls. Taking `&self` rather than `&mut self` is a
/// deliberate nudge in that direction; the core never inspects a
/// strategy's internals beyond this one method.
pub trait Strategy: Send + Sync {
    fn evaluate(&self, context: &StrategyContext) -> Decision;

    /// A human-readable identifier for logs and reports. Defaults to the
    /// Rust type name, which is adequate for ad-hoc strategies but worth
    /// overriding for anything registered under a `strategyType` string.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Errors surfaced while instantiating a strategy by type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrategyFactoryError {
    UnknownStrategyType(String),
}

impl std::fmt::Display for StrategyFactoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyFactoryError::UnknownStrategyType(t) => {
                write!(f, "unknown strategy type: {t}")
            }
        }
    }
}

impl std::error::Error for StrategyFactoryError {}

/// Builds a boxed [`Strategy`] from a `strategyType` string, defaulting
/// unset/empty to `"MA_CROSSOVER"` per `BacktestConfig`'s documented
/// default. The orchestrator depends on this trait, not on any concrete
/// strategy, so new strategy types register without touching it.
pub trait StrategyFactory: Send + Sync {
    fn create(&self, strategy_type: Option<&str>) -> Result<Box<dyn Strategy>, StrategyFactoryError>;
}

/// Errors surfaced by [`StrategyHost`] registration — a single registered
/// strategy's declared timeframe must match the run's configured
/// timeframe, since a strategy evaluating bars at the wrong cadence would
/// silently corrupt every downstream signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrategyHostError {
    TimeframeMismatch {
        expected: String,
        configured: String,
    },
}

impl std::fmt::Display for StrategyHostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyHostError::TimeframeMismatch {
                expected,
                configured,
            } => write!(
                f,
                "strategy expects timeframe {expected} but run is configured for {configured}"
            ),
        }
    }
}

impl std::error::Error for StrategyHostError {}

/// Hosts exactly one strategy instance for a run, enforcing the
/// timeframe-match precondition before any bar reaches it.
pub struct StrategyHost {
    strategy: Box<dyn Strategy>,
    timeframe: String,
}

impl StrategyHost {
    /// Registers `strategy` for evaluation against bars at `run_timeframe`.
    ///
    /// `declared_timeframe` is the strategy's own expectation (e.g. from
    /// its config); if it disagrees with `run_timeframe`, registration
    /// fails up front rather than silently evaluating the wrong cadence.
    pub fn new(
        strategy: Box<dyn Strategy>,
        declared_timeframe: &str,
        run_timeframe: &str,
    ) -> Result<Self, StrategyHostError> {
        if declared_timeframe != run_timeframe {
            return Err(StrategyHostError::TimeframeMismatch {
                expected: declared_timeframe.to_string(),
                configured: run_timeframe.to_string(),
            });
        }
        Ok(Self {
            strategy,
            timeframe: run_timeframe.to_string(),
        })
    }

    pub fn timeframe(&self) -> &str {
        &self.timeframe
    }

    pub fn evaluate(&self, context: &StrategyContext) -> Decision {
        self.strategy.evaluate(context)
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SignalType, StrategyParams};
    use btq_market::Timeframe;

    struct AlwaysHold;

    impl Strategy for AlwaysHold {
        fn evaluate(&self, _context: &StrategyContext) -> Decision {
            Decision::hold()
        }

        fn name(&self) -> &str {
            "ALWAYS_HOLD"
        }
    }

    fn ctx() -> StrategyContext {
        StrategyContext {
            strategy_id: "s1".into(),
            symbol: "AAPL".into(),
            account_tag: "default".into(),
            bars: Vec::new(),
            params: StrategyParams::new(),
            timeframe: Timeframe::new("1d"),
        }
    }

    #[test]
    fn matching_timeframe_registers_and_evaluates() {
        let host = StrategyHost::new(Box::new(AlwaysHold), "1d", "1d").unwrap();
        let decision = host.evaluate(&ctx());
        assert_eq!(decision.signal_type, SignalType::Hold);
        assert_eq!(host.strategy_name(), "ALWAYS_HOLD");
    }

    #[test]
    fn mismatched_timeframe_is_rejected() {
        let err = StrategyHost::new(Box::new(AlwaysHold), "1h", "1d").unwrap_err();
        assert!(matches!(err, StrategyHostError::TimeframeMismatch { .. }));
    }
}
