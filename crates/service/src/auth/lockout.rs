//! Failed-login tracking.
//!
//! State is process local and lost on restart; several server instances do
//! not share it.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Source of "now", swappable in tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    pub max_failed_attempts: u32,
    pub window: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self { max_failed_attempts: 5, window: Duration::minutes(15) }
    }
}

#[derive(Debug, Clone, Copy)]
struct AttemptState {
    failed: u32,
    last_failure: DateTime<Utc>,
}

/// Failed-attempt counters keyed by normalised email.
pub struct LoginAttempts {
    policy: LockoutPolicy,
    entries: DashMap<String, AttemptState>,
    clock: Clock,
}

impl LoginAttempts {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self::with_clock(policy, Arc::new(Utc::now))
    }

    pub fn with_clock(policy: LockoutPolicy, clock: Clock) -> Self {
        Self { policy, entries: DashMap::new(), clock }
    }

    fn key(email: &str) -> String {
        models::admin::normalize_email(email)
    }

    /// True while the email has reached the failure limit and the last
    /// failure is still inside the window. An expired entry is dropped.
    pub fn is_locked(&self, email: &str) -> bool {
        let key = Self::key(email);
        let now = (self.clock)();
        let expired = match self.entries.get(&key) {
            None => return false,
            Some(state) => {
                if now - state.last_failure < self.policy.window {
                    return state.failed >= self.policy.max_failed_attempts;
                }
                true
            }
        };
        if expired {
            self.entries.remove(&key);
        }
        false
    }

    pub fn record_failure(&self, email: &str) {
        let now = (self.clock)();
        let mut entry = self
            .entries
            .entry(Self::key(email))
            .or_insert(AttemptState { failed: 0, last_failure: now });
        entry.failed += 1;
        entry.last_failure = now;
    }

    pub fn clear(&self, email: &str) {
        self.entries.remove(&Self::key(email));
    }

    pub fn failed_attempts(&self, email: &str) -> u32 {
        self.entries.get(&Self::key(email)).map(|s| s.failed).unwrap_or(0)
    }
}
