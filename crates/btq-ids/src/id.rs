use serde::{Deserialize, Serialize};

/// A 128-bit identifier that sorts lexicographically in creation order.
///
/// Layout (16 bytes, most-significant first):
/// - bytes `[0..6]`: milliseconds since the Unix epoch, big-endian (good
///   until the year 10889 — plenty for this domain).
/// - bytes `[6..8]`: a per-process monotonic counter, big-endian, so that
///   two IDs minted in the same millisecond still compare by generation
///   order rather than by the tiebreak of their random tail.
/// - bytes `[8..16]`: random tail, to keep IDs globally unique across
///   processes without coordination.
///
/// Rendered as 32 lowercase hex characters; hex-encoding a fixed-width
/// big-endian byte string preserves byte-order comparison, so `Id`'s
/// derived `Ord` (string comparison) agrees with creation order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Id(String);

impl Id {
    pub(crate) fn from_bytes(bytes: [u8; 16]) -> Self {
        let mut s = String::with_capacity(32);
        for b in bytes {
            s.push_str(&format!("{b:02x}"));
        }
        Id(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Deterministic constructor for tests: zeroes the timestamp/counter
    /// prefix and encodes `n` in the last 8 bytes. `btq-testkit`'s
    /// sequence-based `IdGenerator` fake uses this so scenario tests can
    /// assert on exact, reproducible ids instead of a wall-clock-derived
    /// one.
    pub fn from_sequence(n: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[8..16].copy_from_slice(&n.to_be_bytes());
        Id::from_bytes(bytes)
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_encoding_is_32_chars() {
        let id = Id::from_bytes([0xab; 16]);
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn byte_order_determines_string_order() {
        let a = Id::from_bytes([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        let b = Id::from_bytes([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]);
        assert!(a < b);
    }
}
