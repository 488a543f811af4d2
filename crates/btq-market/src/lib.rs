//! btq-market
//!
//! Market data model: the immutable [`Bar`] type and the [`BarWindow`]
//! sliding buffer the orchestrator feeds to strategies.

mod bar;
mod timeframe;
mod window;

pub use bar::{Bar, BarError};
pub use timeframe::Timeframe;
pub use window::BarWindow;
