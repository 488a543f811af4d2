use btq_decimal::Timestamp;
use btq_market::Bar;
use btq_replay::{BarRepository, ReplayError};

/// An in-memory [`BarRepository`] over a fixed, pre-loaded set of bars.
/// `find_bars` filters by symbol, timeframe, and inclusive timestamp range
/// — the same filter every scenario test across this workspace would
/// otherwise hand-roll.
#[derive(Clone, Debug, Default)]
pub struct InMemoryBarRepository {
    bars: Vec<Bar>,
}

impl InMemoryBarRepository {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn push(&mut self, bar: Bar) {
        self.bars.push(bar);
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

impl BarRepository for InMemoryBarRepository {
    fn find_bars(
        &self,
        symbols: &[String],
        timeframe: &str,
        start_ts: Timestamp,
        end_ts: Timestamp,
    ) -> Result<Vec<Bar>, ReplayError> {
        Ok(self
            .bars
            .iter()
            .filter(|b| {
                symbols.iter().any(|s| s == &b.symbol)
                    && b.timeframe.as_str() == timeframe
                    && b.timestamp >= start_ts
                    && b.timestamp <= end_ts
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_decimal::Money;
    use btq_market::Timeframe;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn bar(symbol: &str, day: u32) -> Bar {
        let ts = NaiveDate::from_ymd_opt(2023, 1, day).unwrap().and_hms_opt(9, 30, 0).unwrap();
        let p = Money::parse("100").unwrap();
        Bar::restore(symbol, Timeframe::new("1d"), ts, p, p, p, p, Decimal::from(1_000), true).unwrap()
    }

    #[test]
    fn filters_by_symbol_timeframe_and_range() {
        let repo = InMemoryBarRepository::new(vec![bar("AAPL", 1), bar("AAPL", 2), bar("MSFT", 1)]);
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(23, 59, 59).unwrap();
        let found = repo.find_bars(&["AAPL".to_string()], "1d", start, end).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].symbol, "AAPL");
    }
}
