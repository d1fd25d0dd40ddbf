//! Lockout policy
//!
//! The lock is permanent once tripped: there is no timed cool-down, only
//! an administrative unlock. The policy therefore reduces to the failure
//! threshold and the arithmetic around it.

use serde::{Deserialize, Serialize};

use crate::DEFAULT_LOCKOUT_THRESHOLD;

/// Failure threshold policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutPolicy {
    /// Consecutive failures at which the account locks
    pub threshold: u32,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOCKOUT_THRESHOLD,
        }
    }
}

impl LockoutPolicy {
    /// Create a strict policy (locks sooner)
    pub fn strict() -> Self {
        Self { threshold: 3 }
    }

    /// Create a lenient policy (more attempts allowed)
    pub fn lenient() -> Self {
        Self { threshold: 8 }
    }

    /// Check whether the given failure count is at or past the threshold
    pub fn locks_at(&self, failed_attempts: u32) -> bool {
        failed_attempts >= self.threshold
    }

    /// Get the number of remaining attempts before lockout
    pub fn attempts_remaining(&self, failed_attempts: u32) -> u32 {
        self.threshold.saturating_sub(failed_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        let policy = LockoutPolicy::default();
        assert_eq!(policy.threshold, 5);

        assert!(!policy.locks_at(0));
        assert!(!policy.locks_at(4));
        assert!(policy.locks_at(5));
        assert!(policy.locks_at(100));
    }

    #[test]
    fn test_attempts_remaining() {
        let policy = LockoutPolicy::default();

        assert_eq!(policy.attempts_remaining(0), 5);
        assert_eq!(policy.attempts_remaining(4), 1);
        assert_eq!(policy.attempts_remaining(5), 0);
        assert_eq!(policy.attempts_remaining(9), 0);
    }

    #[test]
    fn test_presets() {
        assert!(LockoutPolicy::strict().locks_at(3));
        assert!(!LockoutPolicy::lenient().locks_at(5));
    }
}
