/// Errors surfaced by [`crate::DataReplay`] and its [`crate::BarRepository`]
/// dependency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// `next()` was called with no bars remaining.
    Exhausted,
    /// The backing repository failed to materialize bars; the message is
    /// the repository's own description of what went wrong.
    Repository(String),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::Exhausted => write!(f, "replay cursor is exhausted"),
            ReplayError::Repository(msg) => write!(f, "bar repository error: {msg}"),
        }
    }
}

impl std::error::Error for ReplayError {}
