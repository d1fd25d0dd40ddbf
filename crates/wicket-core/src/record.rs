//! Persisted credential record
//!
//! One record per account. The record is owned by the credential store and
//! mutated only through the mutations computed by the lockout guard (plus
//! the administrative unlock and password-change paths in the keeper).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credential state for a single account
///
/// Invariants:
/// - `login_attempts` counts consecutive failures since the last success
///   or administrative unlock
/// - `account_locked` is only ever set once `login_attempts` has reached
///   the lockout threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// PHC-format hash of the current password. Never touched by login
    /// logic; replaced only by the password-change path.
    pub password_hash: String,

    /// Consecutive failed verification attempts
    pub login_attempts: u32,

    /// Locked accounts reject every attempt without further counting
    pub account_locked: bool,

    /// Set only on successful authentication
    pub last_login: Option<DateTime<Utc>>,

    /// When the account was provisioned
    pub created_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Create a freshly provisioned record
    pub fn new(password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            password_hash,
            login_attempts: 0,
            account_locked: false,
            last_login: None,
            created_at: now,
        }
    }
}
