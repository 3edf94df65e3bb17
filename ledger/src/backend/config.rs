//! # Ledger Configuration
//!
//! Settings are resolved in three layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. `config.yaml` in the data directory, when present
//! 3. `TAXI_LEDGER_*` environment variables
//!
//! ## YAML Format
//!
//! ```yaml
//! bind_address: "127.0.0.1:3000"
//! sync_delay_ms: 1200
//! drive:
//!   client_id: "..."
//!   client_secret: "..."
//!   refresh_token: "..."
//! ```

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_SYNC_DELAY_MS: u64 = 1200;

pub const ENV_DATA_DIR: &str = "TAXI_LEDGER_DATA_DIR";
pub const ENV_BIND: &str = "TAXI_LEDGER_BIND";
pub const ENV_SYNC_DELAY_MS: &str = "TAXI_LEDGER_SYNC_DELAY_MS";
pub const ENV_DRIVE_CLIENT_ID: &str = "TAXI_LEDGER_DRIVE_CLIENT_ID";
pub const ENV_DRIVE_CLIENT_SECRET: &str = "TAXI_LEDGER_DRIVE_CLIENT_SECRET";
pub const ENV_DRIVE_REFRESH_TOKEN: &str = "TAXI_LEDGER_DRIVE_REFRESH_TOKEN";

/// OAuth client credentials for the Drive backup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DriveCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl DriveCredentials {
    fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.refresh_token.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub bind_address: String,
    pub sync_delay_ms: u64,
    pub drive: Option<DriveCredentials>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            sync_delay_ms: DEFAULT_SYNC_DELAY_MS,
            drive: None,
        }
    }
}

/// `<Documents>/Taxi Ledger`, falling back to the home directory and then
/// the working directory.
pub fn default_data_dir() -> PathBuf {
    let base = dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("Taxi Ledger")
}

impl LedgerConfig {
    /// Resolve the configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration with a custom environment lookup
    pub fn load_with<F>(env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = env(ENV_DATA_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let mut config = Self::from_file(&data_dir.join(CONFIG_FILE))?;
        config.data_dir = data_dir;
        config.apply_env(env);

        info!(
            "Configuration: data dir {}, bind {}, sync delay {}ms, drive {}",
            config.data_dir.display(),
            config.bind_address,
            config.sync_delay_ms,
            if config.drive_credentials().is_some() { "configured" } else { "not configured" }
        );
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: LedgerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!("Loaded config file {}", path.display());
        Ok(config)
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = env(ENV_BIND) {
            self.bind_address = bind;
        }

        if let Some(raw) = env(ENV_SYNC_DELAY_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.sync_delay_ms = ms,
                Err(_) => warn!("Ignoring {}={:?}: not a number of milliseconds", ENV_SYNC_DELAY_MS, raw),
            }
        }

        let mut drive = self.drive.clone().unwrap_or_default();
        let mut touched = false;
        for (key, field) in [
            (ENV_DRIVE_CLIENT_ID, &mut drive.client_id),
            (ENV_DRIVE_CLIENT_SECRET, &mut drive.client_secret),
            (ENV_DRIVE_REFRESH_TOKEN, &mut drive.refresh_token),
        ] {
            if let Some(value) = env(key) {
                *field = value;
                touched = true;
            }
        }
        if touched {
            self.drive = Some(drive);
        }
    }

    pub fn sync_delay(&self) -> Duration {
        Duration::from_millis(self.sync_delay_ms)
    }

    /// Credentials, only when all three parts are present
    pub fn drive_credentials(&self) -> Option<&DriveCredentials> {
        self.drive.as_ref().filter(|d| d.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(dir: &TempDir, vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mut map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        map.insert(ENV_DATA_DIR.to_string(), dir.path().to_string_lossy().to_string());
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let config = LedgerConfig::load_with(env_from(&dir, &[])).unwrap();

        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.sync_delay(), Duration::from_millis(1200));
        assert!(config.drive_credentials().is_none());
    }

    #[test]
    fn test_file_then_env() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "bind_address: \"0.0.0.0:8080\"\nsync_delay_ms: 500\ndrive:\n  client_id: id\n  client_secret: secret\n  refresh_token: file-token\n",
        )
        .unwrap();

        let config = LedgerConfig::load_with(env_from(&dir, &[])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.sync_delay_ms, 500);
        assert_eq!(config.drive_credentials().unwrap().refresh_token, "file-token");

        let config = LedgerConfig::load_with(env_from(
            &dir,
            &[(ENV_SYNC_DELAY_MS, "2500"), (ENV_DRIVE_REFRESH_TOKEN, "env-token")],
        ))
        .unwrap();
        assert_eq!(config.sync_delay_ms, 2500);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        let drive = config.drive_credentials().unwrap();
        assert_eq!(drive.client_id, "id");
        assert_eq!(drive.refresh_token, "env-token");
    }

    #[test]
    fn test_partial_drive_credentials_ignored() {
        let dir = TempDir::new().unwrap();
        let config = LedgerConfig::load_with(env_from(&dir, &[(ENV_DRIVE_CLIENT_ID, "id")])).unwrap();
        assert!(config.drive.is_some());
        assert!(config.drive_credentials().is_none());
    }

    #[test]
    fn test_bad_delay_keeps_default() {
        let dir = TempDir::new().unwrap();
        let config = LedgerConfig::load_with(env_from(&dir, &[(ENV_SYNC_DELAY_MS, "soon")])).unwrap();
        assert_eq!(config.sync_delay_ms, DEFAULT_SYNC_DELAY_MS);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "sync_delay_ms: [not, a, number]").unwrap();
        assert!(LedgerConfig::load_with(env_from(&dir, &[])).is_err());
    }
}
