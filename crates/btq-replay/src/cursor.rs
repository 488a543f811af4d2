use btq_decimal::{end_of_day, start_of_day};
use btq_market::Bar;

use crate::config::ReplayConfig;
use crate::error::ReplayError;
use crate::repository::BarRepository;

/// A forward-only cursor over a materialized, chronologically sorted set
/// of bars.
///
/// Sort order: ascending by `timestamp`, ties broken by `symbol` ascending
/// — a stable secondary key so two symbols' bars sharing a timestamp
/// always interleave the same way across runs.
pub struct DataReplay {
    bars: Vec<Bar>,
    cursor: usize,
}

impl DataReplay {
    /// Materializes bars via `repository` for the symbols/timeframe/date
    /// range in `config`, then sorts them into replay order.
    pub fn load_data(
        config: &ReplayConfig,
        repository: &dyn BarRepository,
    ) -> Result<Self, ReplayError> {
        let start_ts = start_of_day(config.start_date);
        let end_ts = end_of_day(config.end_date);

        let mut bars = repository.find_bars(
            &config.symbols,
            config.timeframe.as_str(),
            start_ts,
            end_ts,
        )?;

        bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.symbol.cmp(&b.symbol)));

        Ok(Self { bars, cursor: 0 })
    }

    /// Construct directly from an already-loaded, unsorted bar set —
    /// useful for callers (the CLI's CSV loader, tests) that materialize
    /// bars themselves rather than through a [`BarRepository`].
    pub fn from_bars(mut bars: Vec<Bar>) -> Self {
        bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.symbol.cmp(&b.symbol)));
        Self { bars, cursor: 0 }
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.bars.len()
    }

    /// Advances the cursor and returns the bar it now points at.
    pub fn next(&mut self) -> Result<&Bar, ReplayError> {
        if !self.has_next() {
            return Err(ReplayError::Exhausted);
        }
        let bar = &self.bars[self.cursor];
        self.cursor += 1;
        Ok(bar)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn total_bars(&self) -> usize {
        self.bars.len()
    }

    pub fn current_index(&self) -> usize {
        self.cursor
    }

    /// Percentage of bars already consumed, in `[0, 100]`. `100.0` on an
    /// empty replay (there is nothing left to do, so it is trivially
    /// complete).
    pub fn progress_percent(&self) -> f64 {
        if self.bars.is_empty() {
            return 100.0;
        }
        (self.cursor as f64 / self.bars.len() as f64) * 100.0
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
        let ts = NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let p = Money::parse("100").unwrap();
        Bar::restore(symbol, Timeframe::new("1d"), ts, p, p, p, p, Decimal::from(1), true).unwrap()
    }

    #[test]
    fn sorts_by_timestamp_then_symbol() {
        let bars = vec![bar("MSFT", 1), bar("AAPL", 1), bar("AAPL", 2)];
        let mut replay = DataReplay::from_bars(bars);
        let mut symbols = Vec::new();
        while replay.has_next() {
            symbols.push(replay.next().unwrap().symbol.clone());
        }
        assert_eq!(symbols, vec!["AAPL", "MSFT", "AAPL"]);
    }

    #[test]
    fn next_after_exhaustion_is_an_error() {
        let mut replay = DataReplay::from_bars(vec![bar("AAPL", 1)]);
        replay.next().unwrap();
        assert!(!replay.has_next());
        assert_eq!(replay.next().unwrap_err(), ReplayError::Exhausted);
    }

    #[test]
    fn progress_percent_tracks_cursor() {
        let mut replay = DataReplay::from_bars(vec![bar("AAPL", 1), bar("AAPL", 2)]);
        assert_eq!(replay.progress_percent(), 0.0);
        replay.next().unwrap();
        assert_eq!(replay.progress_percent(), 50.0);
        replay.next().unwrap();
        assert_eq!(replay.progress_percent(), 100.0);
    }

    #[test]
    fn reset_returns_cursor_to_start() {
        let mut replay = DataReplay::from_bars(vec![bar("AAPL", 1)]);
        replay.next().unwrap();
        replay.reset();
        assert_eq!(replay.current_index(), 0);
        assert!(replay.has_next());
    }
}
