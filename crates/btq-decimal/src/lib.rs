//! btq-decimal
//!
//! Exact decimal arithmetic and time primitives shared by every other crate
//! in this workspace.
//!
//! - [`Money`]: arbitrary-precision signed decimal for all monetary
//!   quantities (cash, price, commission, P&L). Never backed by `f64`.
//! - [`Timestamp`] / [`TradeDate`]: naïve (timezone-free) date-times and
//!   calendar dates, with the day-arithmetic helpers the walk-forward
//!   window generator and annualized-return calculations need.
//!
//! Percentages and dimensionless ratios (`returnPct`, correlation
//! coefficients, weights) are represented as plain [`rust_decimal::Decimal`]
//! — they are not money and mixing them with [`Money`] is intentionally
//! inconvenient (no shared arithmetic trait impls).

mod money;
mod time;

pub use money::Money;
pub use rust_decimal::Decimal;
pub use time::{days_between, end_of_day, start_of_day, years_between, TradeDate, Timestamp};
