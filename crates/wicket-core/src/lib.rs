//! Wicket Core - Credential records and account lockout decision logic
//!
//! This crate provides the foundational types for the Wicket credential
//! keeper:
//! - The persisted credential record model
//! - The lockout policy (failure threshold arithmetic)
//! - The lockout guard, a pure function from a record and a verification
//!   result to an authentication verdict and the exact record mutation
//!
//! Everything in this crate is IO-free and deterministic. Persistence,
//! password hashing, and session issuance live in `wicket-keeper`.

pub mod guard;
pub mod policy;
pub mod record;

pub use guard::{evaluate, RecordMutation, RejectionReason, Verdict};
pub use policy::LockoutPolicy;
pub use record::CredentialRecord;

/// Consecutive failed attempts before an account is locked
pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 5;

/// Default session validity in hours
pub const SESSION_VALIDITY_HOURS: i64 = 24;
