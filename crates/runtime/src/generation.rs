use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ticket handed out by [`Generation::advance`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u64);

impl Token {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic recency counter shared by every clone.
///
/// A result tagged with a token may only be applied while that token is still
/// current. Callers that need check-then-apply must hold their own lock across
/// both steps; `advance` itself never blocks.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    latest: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, superseding every earlier token.
    pub fn advance(&self) -> Token {
        Token(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> Token {
        Token(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, token: Token) -> bool {
        self.current() == token
    }
}
