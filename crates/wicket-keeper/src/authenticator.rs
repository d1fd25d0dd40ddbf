//! Authentication flow
//!
//! Orchestrates one authentication attempt end to end:
//!
//! 1. Empty credentials are rejected here, before the guard is reached.
//! 2. Unknown accounts get the same generic rejection as wrong passwords,
//!    so an outside caller cannot tell the two apart.
//! 3. Password verification, the guard's decision, and the record mutation
//!    all happen inside a single atomic store update.
//! 4. An accepted verdict gets a session from the issuer.
//!
//! Administrative operations (provisioning, unlock, password change,
//! status) live here too; they are the operator surface of the same store.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use wicket_core::{evaluate, CredentialRecord, LockoutPolicy, RejectionReason, Verdict};

use crate::error::{AuthError, StoreError};
use crate::password;
use crate::session::{Session, SessionConfig, SessionIssuer};
use crate::store::CredentialStore;

/// Operator-facing view of an account's lockout state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStatus {
    pub login_attempts: u32,
    pub account_locked: bool,
    pub attempts_remaining: u32,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Credential authentication with account lockout
pub struct Authenticator<S: CredentialStore> {
    store: S,
    policy: LockoutPolicy,
    sessions: SessionIssuer,
}

impl<S: CredentialStore> Authenticator<S> {
    /// Create an authenticator over the given store
    pub fn new(store: S, policy: LockoutPolicy, session_config: SessionConfig) -> Self {
        Self {
            store,
            policy,
            sessions: SessionIssuer::new(session_config),
        }
    }

    /// Create with the default policy and session window
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, LockoutPolicy::default(), SessionConfig::default())
    }

    /// Provision a new account
    pub fn provision(&self, username: &str, new_password: &str) -> Result<(), AuthError> {
        if username.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        password::validate_password(new_password)?;

        let hash = password::hash_password(new_password)?;
        let record = CredentialRecord::new(hash, Utc::now());

        match self.store.provision(username, record) {
            Ok(()) => Ok(()),
            Err(StoreError::AlreadyExists(name)) => Err(AuthError::AccountExists(name)),
            Err(e) => Err(e.into()),
        }
    }

    /// Authenticate and issue a session on success
    pub fn authenticate(&self, username: &str, submitted_password: &str) -> Result<Session, AuthError> {
        self.verify_and_record(username, submitted_password)?;
        Ok(self.sessions.issue(username))
    }

    /// Run one attempt through the guard inside an atomic store update
    ///
    /// The verdict and the record mutation are computed together under the
    /// store's lock and persisted before this returns. A storage failure
    /// propagates unmodified and no verdict is issued for the attempt.
    fn verify_and_record(&self, username: &str, submitted_password: &str) -> Result<(), AuthError> {
        if username.is_empty() || submitted_password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let updated = self.store.update(username, |record| -> Result<Verdict, AuthError> {
            // Locked accounts are rejected before verification is consulted,
            // so the expensive hash check is skipped for them.
            let password_matches = if record.account_locked {
                false
            } else {
                password::verify_password(submitted_password, &record.password_hash)?
            };

            let (verdict, mutation) = evaluate(record, &self.policy, password_matches, Utc::now());
            if let Some(mutation) = mutation {
                mutation.apply(record);
            }
            Ok(verdict)
        });

        let verdict = match updated {
            Ok(inner) => inner?,
            Err(StoreError::NotFound(_)) => {
                // Same rejection as a wrong password; which branch fired is
                // not observable from outside.
                warn!(username, "authentication attempt for unknown account");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        match verdict {
            Verdict::Accepted => {
                info!(username, "authentication succeeded");
                Ok(())
            }
            Verdict::Rejected(RejectionReason::AccountLocked) => {
                warn!(username, "authentication attempt against locked account");
                Err(AuthError::AccountLocked)
            }
            Verdict::Rejected(RejectionReason::InvalidPassword) => {
                warn!(username, "authentication failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Change an account's password after verifying the current one
    ///
    /// The verification passes through the guard, so failed attempts here
    /// count toward lockout like any other failure.
    pub fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.verify_and_record(username, current_password)?;

        password::validate_password(new_password)?;
        let hash = password::hash_password(new_password)?;
        self.store
            .update(username, |record| record.password_hash = hash)?;

        info!(username, "password changed");
        Ok(())
    }

    /// Administrative unlock: clear the failure counter and the lock
    pub fn unlock(&self, username: &str) -> Result<(), AuthError> {
        self.store.update(username, |record| {
            record.login_attempts = 0;
            record.account_locked = false;
        })?;

        info!(username, "account unlocked by administrator");
        Ok(())
    }

    /// Look up an account's lockout state
    pub fn status(&self, username: &str) -> Result<AccountStatus, AuthError> {
        let record = self
            .store
            .load(username)?
            .ok_or_else(|| StoreError::NotFound(username.to_string()))?;

        Ok(AccountStatus {
            login_attempts: record.login_attempts,
            account_locked: record.account_locked,
            attempts_remaining: self.policy.attempts_remaining(record.login_attempts),
            last_login: record.last_login,
            created_at: record.created_at,
        })
    }

    /// List provisioned accounts
    pub fn list_accounts(&self) -> Result<Vec<String>, AuthError> {
        Ok(self.store.list()?)
    }

    /// The session issuer, for validating and revoking tokens
    pub fn sessions(&self) -> &SessionIssuer {
        &self.sessions
    }
}
