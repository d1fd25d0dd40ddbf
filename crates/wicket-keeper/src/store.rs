//! Credential store
//!
//! One JSON document holds every credential record, keyed by username.
//! All writes go through write-to-temp-then-rename so the document on disk
//! is always a complete, parseable snapshot.
//!
//! The store's contract for authentication is `update`: the closure runs
//! with the record under the store's exclusive lock, and the mutated record
//! is persisted before the lock is released. Read, decide, and write are
//! one atomic step; two racing attempts cannot both observe the same
//! attempt counter, and a failed write leaves both memory and disk on the
//! pre-attempt state.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;
use wicket_core::CredentialRecord;

use crate::error::StoreError;

/// Abstraction over credential persistence
///
/// Implementations must make `update` atomic with respect to other calls on
/// the same store: the closure's read of the record, its decision, and the
/// persisted write happen as one step.
pub trait CredentialStore {
    /// Create a record for a new account. Fails if the account exists.
    fn provision(&self, username: &str, record: CredentialRecord) -> Result<(), StoreError>;

    /// Fetch a record. `None` for unknown accounts.
    fn load(&self, username: &str) -> Result<Option<CredentialRecord>, StoreError>;

    /// Atomically read, mutate, and persist a record
    ///
    /// If persistence fails, the in-memory record is left unchanged and the
    /// error propagates; the caller must treat the whole attempt as
    /// unresolved.
    fn update<T, F>(&self, username: &str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut CredentialRecord) -> T;

    /// List all account names
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// File-backed credential store
pub struct FileCredentialStore {
    path: PathBuf,
    accounts: Mutex<HashMap<String, CredentialRecord>>,
}

impl FileCredentialStore {
    /// Open a store, loading the existing document if present
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let accounts = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            accounts: Mutex::new(accounts),
        })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_accounts(&self) -> std::sync::MutexGuard<'_, HashMap<String, CredentialRecord>> {
        // Mutations are committed whole after a successful persist, so even
        // a poisoned lock still holds a consistent map.
        self.accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write the document atomically
    fn persist(&self, accounts: &HashMap<String, CredentialRecord>) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(accounts)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &contents)?;
        fs::rename(&temp_path, &self.path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn provision(&self, username: &str, record: CredentialRecord) -> Result<(), StoreError> {
        let mut accounts = self.lock_accounts();

        if accounts.contains_key(username) {
            return Err(StoreError::AlreadyExists(username.to_string()));
        }

        let mut staged = accounts.clone();
        staged.insert(username.to_string(), record);
        self.persist(&staged)?;
        *accounts = staged;

        info!(username, "provisioned account");
        Ok(())
    }

    fn load(&self, username: &str) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self.lock_accounts().get(username).cloned())
    }

    fn update<T, F>(&self, username: &str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut CredentialRecord) -> T,
    {
        let mut accounts = self.lock_accounts();

        let mut record = accounts
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(username.to_string()))?;

        let out = f(&mut record);

        let mut staged = accounts.clone();
        staged.insert(username.to_string(), record);
        self.persist(&staged)?;
        *accounts = staged;

        Ok(out)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self.lock_accounts().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
