use std::collections::HashMap;

/// Identifies one scheduled timer.  Tokens are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// What a timer is for.  At most one timer of each kind is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Reconnect,
    ResizeDebounce,
}

/// Bookkeeping for the timers the app has asked the runtime to run.
#[derive(Debug, Default)]
pub struct TimerBook {
    next: u64,
    pending: HashMap<TimerToken, TimerKind>,
}

impl TimerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new timer of `kind`.  Returns the fresh token plus the token
    /// of the timer it replaces, which the runtime has to cancel.
    pub fn arm(&mut self, kind: TimerKind) -> (TimerToken, Option<TimerToken>) {
        let replaced = self.cancel(kind);
        self.next += 1;
        let token = TimerToken(self.next);
        self.pending.insert(token, kind);
        (token, replaced)
    }

    /// Forget the pending timer of `kind`, if any, and return its token.
    pub fn cancel(&mut self, kind: TimerKind) -> Option<TimerToken> {
        let token = self.pending_token(kind)?;
        self.pending.remove(&token);
        Some(token)
    }

    /// A timer fired.  Yields its kind only if it is still pending; stale or
    /// cancelled tokens give `None`.
    pub fn fire(&mut self, token: TimerToken) -> Option<TimerKind> {
        self.pending.remove(&token)
    }

    pub fn pending_token(&self, kind: TimerKind) -> Option<TimerToken> {
        self.pending
            .iter()
            .find(|(_, pending)| **pending == kind)
            .map(|(token, _)| *token)
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending_token(kind).is_some()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
