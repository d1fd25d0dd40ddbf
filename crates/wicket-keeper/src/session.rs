//! Session issuance and validation
//!
//! A session is issued for an accepted authentication verdict and stays
//! valid for a fixed window (24 hours by default). While a session is
//! valid, protected operations check the session; the lockout guard is not
//! consulted again.
//!
//! Sessions are held server-side and looked up by token, so validation is
//! presence plus expiry.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AuthError;
use wicket_core::SESSION_VALIDITY_HOURS;

/// Session configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hours a session stays valid after issuance
    pub validity_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            validity_hours: SESSION_VALIDITY_HOURS,
        }
    }
}

impl SessionConfig {
    fn validity(&self) -> Duration {
        Duration::hours(self.validity_hours)
    }
}

/// An issued session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token
    pub token: Uuid,
    /// Account the session was issued for
    pub username: String,
    /// When the session was issued
    pub issued_at: DateTime<Utc>,
    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check validity at a given instant
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Check validity now
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// Issues sessions for accepted verdicts and validates presented tokens
pub struct SessionIssuer {
    config: SessionConfig,
    active: Mutex<HashMap<Uuid, Session>>,
}

impl SessionIssuer {
    /// Create an issuer with the given configuration
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            active: Mutex::new(HashMap::new()),
        }
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Session>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Issue a new session for an authenticated account
    pub fn issue(&self, username: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4(),
            username: username.to_string(),
            issued_at: now,
            expires_at: now + self.config.validity(),
        };

        self.lock_active().insert(session.token, session.clone());
        info!(username, expires_at = %session.expires_at, "issued session");
        session
    }

    /// Validate a presented token
    ///
    /// Expired sessions are dropped from the registry as a side effect.
    pub fn validate(&self, token: &Uuid) -> Result<Session, AuthError> {
        let mut active = self.lock_active();

        match active.get(token) {
            Some(session) if session.is_valid() => Ok(session.clone()),
            Some(_) => {
                active.remove(token);
                Err(AuthError::InvalidSession)
            }
            None => Err(AuthError::InvalidSession),
        }
    }

    /// Revoke a session before its window ends. Returns true if it existed.
    pub fn revoke(&self, token: &Uuid) -> bool {
        self.lock_active().remove(token).is_some()
    }

    /// Drop every expired session, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut active = self.lock_active();
        let before = active.len();
        active.retain(|_, session| session.is_valid_at(now));
        before - active.len()
    }

    /// Number of live sessions in the registry
    pub fn active_count(&self) -> usize {
        self.lock_active().len()
    }
}

impl Default for SessionIssuer {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
