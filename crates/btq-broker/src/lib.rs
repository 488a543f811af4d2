//! btq-broker
//!
//! A deterministic virtual broker: fills `Market`/`Limit` orders against
//! historical bars using only that bar's own fields (no lookahead),
//! applies slippage and commission, and tracks cash.

mod broker;
mod types;

pub use broker::VirtualBroker;
pub use types::{Fill, Order, OrderKind, OrderSide};
