use chrono::{DateTime, Duration, Utc};

/// Queries shorter than this (in characters, after trimming) never reach the network
pub const MIN_QUERY_CHARS: usize = 5;

/// Backoff after an observed error
pub const COOLDOWN_MS: i64 = 2000;

/// Why a query was not dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    TooShort,
    Cooldown,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Blocked(BlockReason),
}

/// Last error shown to the user and when it happened.
///
/// While `last_error_message` is non-empty and less than the cooldown has
/// elapsed since `last_request_at`, nothing may be dispatched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooldownState {
    pub last_error_message: String,
    pub last_request_at: Option<DateTime<Utc>>,
}

impl CooldownState {
    /// Record a failure. Returns true if the message differs from the
    /// previous one and should be shown to the user.
    pub fn arm(&mut self, message: &str, now: DateTime<Utc>) -> bool {
        let is_new = self.last_error_message != message;
        self.last_error_message = message.to_string();
        self.last_request_at = Some(now);
        is_new
    }

    /// Forget the last error after a successful response
    pub fn clear(&mut self) {
        self.last_error_message.clear();
    }

    pub fn blocks(&self, now: DateTime<Utc>, window: Duration) -> bool {
        if self.last_error_message.is_empty() {
            return false;
        }
        match self.last_request_at {
            Some(at) => now - at < window,
            None => false,
        }
    }
}

/// What the gate needs to know about previous dispatches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateState {
    /// Trimmed text of the most recently dispatched query
    pub last_query: Option<String>,
    /// Whether that dispatch ended in an error
    pub last_failed: bool,
    pub cooldown: CooldownState,
}

/// Decides whether a query may be sent to the AI search endpoint
#[derive(Debug, Clone)]
pub struct SearchGate {
    min_chars: usize,
    cooldown: Duration,
}

impl Default for SearchGate {
    fn default() -> Self {
        Self {
            min_chars: MIN_QUERY_CHARS,
            cooldown: Duration::milliseconds(COOLDOWN_MS),
        }
    }
}

impl SearchGate {
    /// Pure eligibility check; does not touch `state`.
    pub fn check(&self, query: &str, state: &GateState, now: DateTime<Utc>) -> GateDecision {
        let query = query.trim();

        if query.chars().count() < self.min_chars {
            return GateDecision::Blocked(BlockReason::TooShort);
        }

        if state.cooldown.blocks(now, self.cooldown) {
            return GateDecision::Blocked(BlockReason::Cooldown);
        }

        if !state.last_failed && state.last_query.as_deref() == Some(query) {
            return GateDecision::Blocked(BlockReason::Duplicate);
        }

        GateDecision::Allowed
    }
}
