use btq_decimal::Timestamp;
use btq_market::Bar;

use crate::ReplayError;

/// External storage for bars. `btq-replay` depends only on this trait, not
/// on any concrete database — `btq-testkit` supplies an in-memory
/// implementation for tests, and a real deployment backs it with whatever
/// store it likes.
pub trait BarRepository: Send + Sync {
    fn find_bars(
        &self,
        symbols: &[String],
        timeframe: &str,
        start_ts: Timestamp,
        end_ts: Timestamp,
    ) -> Result<Vec<Bar>, ReplayError>;
}
