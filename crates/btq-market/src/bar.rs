use btq_decimal::{Money, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Timeframe;

/// Errors that can arise constructing a `Bar` from external storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BarError {
    /// `low` must be `<= {open, close}` and `<= high`.
    LowAboveOpenOrClose { low: Money, open: Money, close: Money },
    /// `high` must be `>= {open, close}` and `>= low`.
    HighBelowOpenOrClose { high: Money, open: Money, close: Money },
    /// `volume` must be non-negative.
    NegativeVolume { volume: Decimal },
}

impl std::fmt::Display for BarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BarError::LowAboveOpenOrClose { low, open, close } => write!(
                f,
                "low {low} must be <= open {open} and <= close {close}"
            ),
            BarError::HighBelowOpenOrClose { high, open, close } => write!(
                f,
                "high {high} must be >= open {open} and >= close {close}"
            ),
            BarError::NegativeVolume { volume } => write!(f, "volume must be >= 0, got {volume}"),
        }
    }
}

impl std::error::Error for BarError {}

/// An immutable OHLCV snapshot for a `(symbol, timeframe, timestamp)` key.
///
/// Invariants (enforced by [`Bar::restore`]):
/// - `low <= {open, close} <= high`
/// - `volume >= 0`
///
/// Monotonicity of `timestamp` per `(symbol, timeframe)` is a replay-level
/// invariant (see `btq-replay`), not checked here — a single `Bar` has no
/// notion of its neighbors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub timestamp: Timestamp,
    pub open: Money,
    pub high: Money,
    pub low: Money,
    pub close: Money,
    pub volume: Decimal,
    /// `false` marks an in-progress (not-yet-closed) bar; replay and the
    /// orchestrator both reject incomplete bars outright (anti-lookahead).
    pub closed: bool,
}

impl Bar {
    /// Construct a `Bar` from external storage, validating its OHLC/volume
    /// invariants. This is the only constructor — there is no "trust me"
    /// bypass, because a malformed bar corrupts every downstream estimator.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        timestamp: Timestamp,
        open: Money,
        high: Money,
        low: Money,
        close: Money,
        volume: Decimal,
        closed: bool,
    ) -> Result<Self, BarError> {
        if low > open || low > close || low > high {
            return Err(BarError::LowAboveOpenOrClose { low, open, close });
        }
        if high < open || high < close {
            return Err(BarError::HighBelowOpenOrClose { high, open, close });
        }
        if volume.is_sign_negative() && !volume.is_zero() {
            return Err(BarError::NegativeVolume { volume });
        }

        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            closed,
        })
    }
}
