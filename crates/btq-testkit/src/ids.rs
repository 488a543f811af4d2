use std::sync::atomic::{AtomicU64, Ordering};

use btq_ids::{Id, IdGenerator};

/// A deterministic, sequence-based [`IdGenerator`] fake: the `n`th call
/// returns `Id::from_sequence(n)`. Unlike [`btq_ids::MonotonicIdGenerator`],
/// two instances started fresh produce byte-identical ids for the same
/// call sequence, so scenario tests can assert on exact id values (P6's
/// "byte-equal for decimals" extended to ids in a deterministic-replay
/// test).
#[derive(Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> Id {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        Id::from_sequence(n)
    }
}
