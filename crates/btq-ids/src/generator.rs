use parking_lot::Mutex;
use rand::RngCore;

use crate::Id;

/// Mints [`Id`]s for runs, orders, fills, trades, and signals.
///
/// Implementations must guarantee that IDs minted in generation order also
/// sort in generation order — [`MonotonicIdGenerator`] is the default,
/// process-wide implementation; `btq-testkit` supplies a deterministic
/// sequence-based fake for tests that assert on exact ID values.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Id;
}

struct Counter {
    last_millis: u64,
    seq: u16,
}

/// The default [`IdGenerator`]: millis-since-epoch + a same-millisecond
/// sequence counter + 8 random bytes, under a single mutex.
///
/// The mutex is uncontended in the common case (one orchestrator thread
/// minting ids) and only briefly held across a clock read, a counter bump,
/// and an RNG draw — it is not on any hot per-bar path that needs lock-free
/// throughput.
pub struct MonotonicIdGenerator {
    state: Mutex<Counter>,
}

impl MonotonicIdGenerator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Counter {
                last_millis: 0,
                seq: 0,
            }),
        }
    }

    fn next_millis_and_seq(&self) -> (u64, u16) {
        let millis = current_millis();
        let mut guard = self.state.lock();
        if millis == guard.last_millis {
            guard.seq = guard.seq.wrapping_add(1);
        } else {
            guard.last_millis = millis;
            guard.seq = 0;
        }
        (guard.last_millis, guard.seq)
    }
}

impl Default for MonotonicIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for MonotonicIdGenerator {
    fn next_id(&self) -> Id {
        let (millis, seq) = self.next_millis_and_seq();
        let mut bytes = [0u8; 16];
        bytes[0..6].copy_from_slice(&millis.to_be_bytes()[2..8]);
        bytes[6..8].copy_from_slice(&seq.to_be_bytes());
        rand::thread_rng().fill_bytes(&mut bytes[8..16]);
        Id::from_bytes(bytes)
    }
}

fn current_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_millis() as u64
}
