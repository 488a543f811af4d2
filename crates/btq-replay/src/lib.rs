//! btq-replay
//!
//! Materializes bars for a run's configured symbols/timeframe/date range
//! and exposes them through a forward-only chronological cursor.

mod config;
mod cursor;
mod error;
mod repository;

pub use config::ReplayConfig;
pub use cursor::DataReplay;
pub use error::ReplayError;
pub use repository::BarRepository;
