//! btq-ids
//!
//! 128-bit identifiers for runs, orders, fills, trades, and signals.
//! IDs are time-prefixed so that lexicographic string order always agrees
//! with generation order, letting callers sort or range-scan on the ID
//! alone without a separate `created_at` index.

mod generator;
mod id;

pub use generator::{IdGenerator, MonotonicIdGenerator};
pub use id::Id;
