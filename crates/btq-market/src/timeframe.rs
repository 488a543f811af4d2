use serde::{Deserialize, Serialize};

/// A bar timeframe tag (`"1m"`, `"5m"`, `"1d"`, …).
///
/// Opaque to the core — it is matched verbatim against the config's
/// requested timeframe and never parsed into a duration. Two `Timeframe`s
/// are equal iff their tags are byte-equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timeframe(String);

impl Timeframe {
    pub fn new(tag: impl Into<String>) -> Self {
        Timeframe(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Timeframe {
    fn from(s: &str) -> Self {
        Timeframe::new(s)
    }
}

impl From<String> for Timeframe {
    fn from(s: String) -> Self {
        Timeframe::new(s)
    }
}
