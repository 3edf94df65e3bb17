//! # Sync Settings Repository
//!
//! Persists the backup preferences (`enabled`, `lastSyncAt`) as
//! `sync_settings.yaml` in the data directory.
//!
//! ```text
//! data/
//! ├── config.yaml
//! ├── ledger.db
//! └── sync_settings.yaml    ← This module manages this file
//! ```

use anyhow::Result;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::domain::models::sync::SyncSettings;

pub const SYNC_SETTINGS_FILE: &str = "sync_settings.yaml";

#[derive(Clone)]
pub struct SyncSettingsRepository {
    path: PathBuf,
}

impl SyncSettingsRepository {
    pub fn new<P: AsRef<Path>>(data_directory: P) -> Self {
        Self {
            path: data_directory.as_ref().join(SYNC_SETTINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields defaults, a corrupt one is logged
    /// and replaced by defaults.
    pub fn load(&self) -> Result<SyncSettings> {
        if !self.path.exists() {
            debug!("No sync settings at {:?}, using defaults", self.path);
            return Ok(SyncSettings::default());
        }

        let yaml_content = fs::read_to_string(&self.path)?;
        match serde_yaml::from_str::<SyncSettings>(&yaml_content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!("Ignoring unreadable sync settings {:?}: {}", self.path, e);
                Ok(SyncSettings::default())
            }
        }
    }

    /// Save settings with an atomic write: temp file, then rename
    pub fn save(&self, settings: &SyncSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yaml::to_string(settings)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &self.path)?;

        debug!("Saved sync settings to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SyncSettingsRepository::new(temp_dir.path());

        let settings = repo.load().unwrap();
        assert_eq!(settings, SyncSettings::default());
        assert!(!settings.enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SyncSettingsRepository::new(temp_dir.path());
        let settings = SyncSettings {
            enabled: true,
            last_sync_at: Some(1_700_000_000_000),
        };

        repo.save(&settings).unwrap();

        assert!(repo.path().exists());
        assert!(!repo.path().with_extension("tmp").exists());
        assert_eq!(repo.load().unwrap(), settings);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SyncSettingsRepository::new(temp_dir.path());
        fs::write(repo.path(), "enabled: [not, a, bool").unwrap();

        assert_eq!(repo.load().unwrap(), SyncSettings::default());
    }
}
