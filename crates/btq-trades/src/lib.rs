//! btq-trades
//!
//! The long-only FIFO trade matcher: turns BUY/SELL fills into opened and
//! closed [`Trade`]s, computing realized P&L on close.

mod matcher;
mod types;

pub use matcher::{TradeMatcher, TradeMatcherConfig, TradeMatcherError};
pub use types::{MatcherFill, Trade, TradeStatus};
