use std::collections::VecDeque;

use crate::Bar;

/// A bounded sliding window of bars, oldest-first.
///
/// Invariant: once `len() > cap`, the oldest bar is evicted on the next
/// `push` — the window never exceeds `cap` bars. `cap` is expected to be at
/// least the strategy's minimum lookback (21 bars per the orchestrator's
/// warm-up rule) and is itself capped at 100 by the orchestrator's default
/// configuration; `BarWindow` itself does not enforce an upper bound on
/// `cap` — that policy lives one layer up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BarWindow {
    cap: usize,
    bars: VecDeque<Bar>,
}

impl BarWindow {
    /// Construct an empty window with the given capacity.
    ///
    /// # Panics
    /// Panics if `cap == 0` — a zero-capacity window can never satisfy the
    /// strategy's minimum-lookback precondition and indicates a
    /// configuration bug, not a runtime condition to recover from.
    pub fn new(cap: usize) -> Self {
        assert!(cap > 0, "BarWindow capacity must be > 0");
        Self {
            cap,
            bars: VecDeque::with_capacity(cap),
        }
    }

    /// Append a bar, evicting the oldest if at capacity. Amortized O(1).
    pub fn push(&mut self, bar: Bar) {
        if self.bars.len() == self.cap {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
    }

    /// Number of bars currently held.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Bar> {
        self.bars.iter()
    }

    /// The most recently pushed bar, if any.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// A cheap, read-only snapshot handed to strategies — an owned `Vec`
    /// clone of the current window contents, oldest to newest. Strategies
    /// receive this by value so they cannot mutate replay history through a
    /// shared reference.
    pub fn snapshot(&self) -> Vec<Bar> {
        self.bars.iter().cloned().collect()
    }
}
