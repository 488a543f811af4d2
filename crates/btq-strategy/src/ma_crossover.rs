use rust_decimal::Decimal;

use crate::host::Strategy;
use crate::types::{Decision, SignalType, StrategyContext};

/// The default strategy behind `strategyType = "MA_CROSSOVER"`: buy when
/// the fast simple moving average crosses above the slow one, sell on the
/// reverse cross. Holds otherwise.
///
/// Parameters (read from `StrategyContext::params`, falling back to the
/// defaults below when absent or not a JSON number): `fast_period` (5),
/// `slow_period` (20).
pub struct MaCrossoverStrategy {
    default_fast: usize,
    default_slow: usize,
}

impl MaCrossoverStrategy {
    pub fn new() -> Self {
        Self {
            default_fast: 5,
            default_slow: 20,
        }
    }

    fn period(&self, context: &StrategyContext, key: &str, fallback: usize) -> usize {
        context
            .params
            .get(key)
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(fallback)
    }
}

impl Default for MaCrossoverStrategy {
    fn default() -> Self {
        Self::new()
    }
}

fn simple_moving_average(closes: &[Decimal], period: usize) -> Option<Decimal> {
    if closes.len() < period || period == 0 {
        return None;
    }
    let window = &closes[closes.len() - period..];
    let sum: Decimal = window.iter().copied().sum();
    Some(sum / Decimal::from(period as u64))
}

impl Strategy for MaCrossoverStrategy {
    fn evaluate(&self, context: &StrategyContext) -> Decision {
        let fast_period = self.period(context, "fast_period", self.default_fast);
        let slow_period = self.period(context, "slow_period", self.default_slow);

        if context.bars.len() < slow_period + 1 {
            return Decision::hold();
        }

        let closes: Vec<Decimal> = context.bars.iter().map(|b| b.close.raw()).collect();

        let fast_now = simple_moving_average(&closes, fast_period);
        let slow_now = simple_moving_average(&closes, slow_period);
        let fast_prev = simple_moving_average(&closes[..closes.len() - 1], fast_period);
        let slow_prev = simple_moving_average(&closes[..closes.len() - 1], slow_period);

        let (fast_now, slow_now, fast_prev, slow_prev) =
            match (fast_now, slow_now, fast_prev, slow_prev) {
                (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
                _ => return Decision::hold(),
            };

        let crossed_up = fast_prev <= slow_prev && fast_now > slow_now;
        let crossed_down = fast_prev >= slow_prev && fast_now < slow_now;

        if crossed_up {
            Decision {
                signal_type: SignalType::Buy,
                target_value: None,
                reason: format!(
                    "fast MA({fast_period}) crossed above slow MA({slow_period})"
                ),
                ttl_seconds: 0,
            }
        } else if crossed_down {
            Decision {
                signal_type: SignalType::Sell,
                target_value: None,
                reason: format!(
                    "fast MA({fast_period}) crossed below slow MA({slow_period})"
                ),
                ttl_seconds: 0,
            }
        } else {
            Decision::hold()
        }
    }

    fn name(&self) -> &str {
        "MA_CROSSOVER"
    }
}
