use std::collections::BTreeMap;

use btq_market::{Bar, Timeframe};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a [`crate::Strategy`] wants to do on the current bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalType {
    Buy,
    Sell,
    Hold,
}

/// Free-form strategy parameters, keyed by name. A `BTreeMap` so that a
/// strategy's configured parameters iterate and serialize in a stable
/// (alphabetical) order regardless of how they were inserted.
pub type StrategyParams = BTreeMap<String, serde_json::Value>;

/// The read-only view a [`crate::Strategy`] evaluates against.
///
/// `bars` holds at most the last 100 bars, oldest first (the orchestrator's
/// warm-up and trim policy); a strategy sees nothing beyond this window —
/// no access to future bars, no access to orchestrator or broker state.
#[derive(Clone, Debug)]
pub struct StrategyContext {
    pub strategy_id: String,
    pub symbol: String,
    pub account_tag: String,
    pub bars: Vec<Bar>,
    pub params: StrategyParams,
    pub timeframe: Timeframe,
}

impl StrategyContext {
    /// The most recent bar in the window, if any.
    pub fn latest_bar(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

/// A strategy's output for one bar: `Hold` carries no signal downstream,
/// `Buy`/`Sell` become a [`crate::Signal`] and, from there, an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub signal_type: SignalType,
    /// Desired position size. `None` lets the orchestrator apply its
    /// default order quantity; ignored entirely when `signal_type` is
    /// `Hold`.
    pub target_value: Option<Decimal>,
    pub reason: String,
    pub ttl_seconds: i64,
}

impl Decision {
    pub fn hold() -> Self {
        Self {
            signal_type: SignalType::Hold,
            target_value: None,
            reason: String::new(),
            ttl_seconds: 0,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.signal_type != SignalType::Hold
    }
}

/// A realized, timestamped trading intent produced from a non-`Hold`
/// [`Decision`] — the unit the orchestrator turns into an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub strategy_id: String,
    pub symbol: String,
    pub signal_type: SignalType,
    pub target_value: Option<Decimal>,
    pub reason: String,
    pub ttl_seconds: i64,
}
