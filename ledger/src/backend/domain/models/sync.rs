//! Domain models for backup synchronization.
use serde::{Deserialize, Serialize};

use crate::backend::storage::remote::{AuthError, RemoteError};

/// Tokens are treated as expired this long before their actual expiry.
pub const TOKEN_EXPIRY_MARGIN_MS: i64 = 20_000;

/// Bearer credential for the backup store. Held in memory only.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: i64, // epoch millis
}

impl Credential {
    /// Lifetimes too large to represent saturate to "never expires".
    pub fn new(access_token: impl Into<String>, expires_in_secs: u64, now_millis: i64) -> Self {
        let lifetime_ms = i64::try_from(expires_in_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        Self {
            access_token: access_token.into(),
            expires_at: now_millis.saturating_add(lifetime_ms),
        }
    }

    pub fn is_valid_at(&self, now_millis: i64) -> bool {
        !self.access_token.is_empty()
            && now_millis < self.expires_at.saturating_sub(TOKEN_EXPIRY_MARGIN_MS)
    }
}

/// Persisted sync preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub last_sync_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    pub enabled: bool,
    pub signed_in: bool,
    pub online: bool,
    pub syncing: bool,
    pub last_sync_at: Option<i64>,
}

/// Outcome of one completed sync cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub reason: String,
    pub local_count: usize,
    pub remote_count: usize,
    pub merged_count: usize,
    pub pulled_count: usize,
    pub last_sync_at: i64,
}

/// Outcome of a restore (download and merge, no upload)
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreReport {
    pub remote_count: usize,
    pub merged_count: usize,
    pub last_sync_at: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Sync is disabled")]
    Disabled,
    #[error("Network is offline")]
    Offline,
    #[error("Not authorized: sign in to enable backup")]
    NotAuthorized,
    #[error("A sync is already in progress")]
    AlreadySyncing,
    #[error("Local storage error: {0}")]
    Storage(#[from] anyhow::Error),
    #[error("Remote transport error: {0}")]
    Transport(String),
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unauthorized => SyncError::NotAuthorized,
            other => SyncError::Transport(other.to_string()),
        }
    }
}

impl From<AuthError> for SyncError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Transport(e) => SyncError::Transport(e.to_string()),
            _ => SyncError::NotAuthorized,
        }
    }
}

impl SyncError {
    /// Guard outcomes are raised before any I/O happens.
    pub fn is_guard(&self) -> bool {
        matches!(
            self,
            SyncError::Disabled | SyncError::Offline | SyncError::NotAuthorized | SyncError::AlreadySyncing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_validity_margin() {
        let cred = Credential::new("tok", 60, 1_000_000);
        assert_eq!(cred.expires_at, 1_060_000);
        assert!(cred.is_valid_at(1_000_000));
        assert!(cred.is_valid_at(1_039_999));
        assert!(!cred.is_valid_at(1_040_000));
    }

    #[test]
    fn test_short_lived_credential_is_never_valid() {
        let cred = Credential::new("tok", 10, 0);
        assert!(!cred.is_valid_at(0));
    }

    #[test]
    fn test_huge_lifetime_saturates() {
        let now = 1_700_000_000_000;
        let cred = Credential::new("tok", 10_000_000_000_000_000, now);
        assert_eq!(cred.expires_at, i64::MAX);
        assert!(cred.is_valid_at(now));

        let cred = Credential::new("tok", u64::MAX, now);
        assert!(cred.is_valid_at(now));

        let cred = Credential::new("tok", 60, i64::MIN);
        assert!(cred.is_valid_at(i64::MIN));
    }

    #[test]
    fn test_empty_token_invalid() {
        let cred = Credential::new("", 3600, 0);
        assert!(!cred.is_valid_at(0));
    }

    #[test]
    fn test_remote_unauthorized_maps_to_not_authorized() {
        let err: SyncError = RemoteError::Unauthorized.into();
        assert!(matches!(err, SyncError::NotAuthorized));

        let err: SyncError = RemoteError::Status(500, "boom".to_string()).into();
        assert!(matches!(err, SyncError::Transport(_)));
        assert!(!err.is_guard());
    }

    #[test]
    fn test_auth_failures_map_to_not_authorized() {
        let err: SyncError = AuthError::NotConfigured.into();
        assert!(matches!(err, SyncError::NotAuthorized));
        assert!(err.is_guard());

        let err: SyncError = AuthError::Rejected(400, "invalid_grant".to_string()).into();
        assert!(matches!(err, SyncError::NotAuthorized));
    }
}
