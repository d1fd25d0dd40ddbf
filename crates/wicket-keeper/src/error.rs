//! Error types for the Wicket keeper

use thiserror::Error;

/// Errors surfaced by the authentication flow and admin operations
///
/// The variants are distinct for operators, logs, and tests. Anything shown
/// to an unauthenticated caller must go through
/// [`wicket_core::RejectionReason::public_message`] instead, which collapses
/// every rejection into one string.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown account or wrong password - deliberately not distinguished
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account is locked; only an administrative unlock clears this
    #[error("account locked after too many failed attempts")]
    AccountLocked,

    /// Provisioning attempted over an existing account
    #[error("account already exists: {0}")]
    AccountExists(String),

    /// Password rejected at provisioning or change time
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    /// Password hashing or hash parsing failed
    #[error("hashing error: {0}")]
    Hashing(String),

    /// Session token unknown, revoked, or past its validity window
    #[error("session expired or unknown")]
    InvalidSession,

    /// Storage failure, propagated unmodified; the attempt is unresolved
    /// and the caller may retry
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from the credential store
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No record exists for the account
    #[error("no such account: {0}")]
    NotFound(String),

    /// A record already exists for the account
    #[error("account already exists: {0}")]
    AlreadyExists(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
