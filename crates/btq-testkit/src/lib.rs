//! btq-testkit
//!
//! In-memory fakes for the repository/factory/id-generator seams (/):
//! no I/O, no real randomness, deterministic enough for scenario tests to
//! assert on exact values. Not used by any production build target.

mod bars;
mod ids;
mod runs;
mod strategies;

pub use bars::InMemoryBarRepository;
pub use ids::SequentialIdGenerator;
pub use runs::{InMemoryRunRepository, RecordedCall};
pub use strategies::{AlwaysHoldStrategyFactory, FixedDecisionStrategy, ScriptedStrategy};
