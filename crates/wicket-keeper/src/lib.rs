//! Wicket Keeper - the stateful side of Wicket authentication
//!
//! This crate wires the pure lockout guard from `wicket-core` to its
//! collaborators:
//! - Argon2id password hashing and verification
//! - A persisted credential store with atomic read-decide-write updates
//! - A session issuer with a fixed validity window
//! - The authentication flow and administrative operations
//!
//! The `wicket-keeper` binary exposes the administrative operations
//! (provisioning, status, unlock, password change) as a CLI.

pub mod authenticator;
pub mod config;
pub mod error;
pub mod password;
pub mod session;
pub mod store;

pub use authenticator::{AccountStatus, Authenticator};
pub use config::KeeperConfig;
pub use error::{AuthError, StoreError};
pub use session::{Session, SessionConfig, SessionIssuer};
pub use store::{CredentialStore, FileCredentialStore};
