use btq_decimal::TradeDate;
use btq_market::Timeframe;
use serde::{Deserialize, Serialize};

/// Selects the bars a [`crate::DataReplay`] materializes: which symbols, at
/// which timeframe, over which inclusive calendar-day range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub symbols: Vec<String>,
    pub timeframe: Timeframe,
    pub start_date: TradeDate,
    pub end_date: TradeDate,
}
