//! Keeper configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use wicket_core::{LockoutPolicy, DEFAULT_LOCKOUT_THRESHOLD, SESSION_VALIDITY_HOURS};

use crate::error::StoreError;
use crate::session::SessionConfig;

/// Keeper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperConfig {
    /// Directory holding the credential document
    pub data_dir: PathBuf,

    /// Consecutive failures at which an account locks
    pub lockout_threshold: u32,

    /// Hours a session stays valid after issuance
    pub session_validity_hours: i64,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            lockout_threshold: DEFAULT_LOCKOUT_THRESHOLD,
            session_validity_hours: SESSION_VALIDITY_HOURS,
        }
    }
}

impl KeeperConfig {
    /// Platform default data directory
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wicket")
    }

    /// Create config rooted at a custom data directory
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Path of the credential document inside the data directory
    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join("credentials.json")
    }

    /// The lockout policy this config describes
    pub fn policy(&self) -> LockoutPolicy {
        LockoutPolicy {
            threshold: self.lockout_threshold,
        }
    }

    /// The session window this config describes
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            validity_hours: self.session_validity_hours,
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = KeeperConfig::default();
        assert_eq!(config.lockout_threshold, 5);
        assert_eq!(config.session_validity_hours, 24);
        assert_eq!(config.policy().threshold, 5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keeper.json");

        let config = KeeperConfig::with_data_dir(dir.path().join("data"));
        config.save(&path).unwrap();

        let loaded = KeeperConfig::load(&path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.lockout_threshold, 5);
    }

    #[test]
    fn test_credentials_path() {
        let config = KeeperConfig::with_data_dir(PathBuf::from("/tmp/wicket-test"));
        assert_eq!(
            config.credentials_path(),
            PathBuf::from("/tmp/wicket-test/credentials.json")
        );
    }
}
