//! Sync service: backup and restore of the day store against the remote
//! snapshot.
//!
//! ## Cycle
//!
//! 1. Guard: enabled, online, valid credential, nothing in flight. No I/O.
//! 2. Locate (or create) the backup file, download and parse it leniently.
//! 3. Merge local and remote with last-write-wins, local winning ties.
//! 4. Write every merged record back to the local store.
//! 5. Upload the merged set as one overwrite.
//! 6. Record the completion time.
//!
//! A failure at any step aborts the cycle. Local writes already made in step 4
//! stay, and the enabled flag and credential are never touched by a failure.
//!
//! The service never starts an interactive sign-in by itself. Only
//! [`SyncService::sign_in`] may ask the auth provider for interaction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::backend::domain::merge::merge;
use crate::backend::domain::models::day::DayRecord;
use crate::backend::domain::models::sync::{
    Credential, RestoreReport, SyncError, SyncReport, SyncSettings, SyncState,
};
use crate::backend::storage::remote::{AuthMode, AuthProvider};
use crate::backend::storage::{DayStorage, RemoteSnapshot, RemoteSnapshotStore, SyncSettingsRepository};

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

struct RuntimeState {
    enabled: bool,
    online: bool,
    credential: Option<Credential>,
    last_sync_at: Option<i64>,
}

impl RuntimeState {
    fn valid_token(&self, now: i64) -> Option<String> {
        self.credential
            .as_ref()
            .filter(|c| c.is_valid_at(now))
            .map(|c| c.access_token.clone())
    }
}

/// The single outstanding debounced run. `generation` tells a finished
/// timer whether the slot still belongs to it.
#[derive(Default)]
struct PendingSync {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

/// Clears the in-flight flag when a cycle ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct SyncInner {
    store: Arc<dyn DayStorage>,
    remote: Arc<dyn RemoteSnapshotStore>,
    auth: Arc<dyn AuthProvider>,
    settings: SyncSettingsRepository,
    state: Mutex<RuntimeState>,
    syncing: AtomicBool,
    pending: Mutex<PendingSync>,
}

#[derive(Clone)]
pub struct SyncService {
    inner: Arc<SyncInner>,
}

impl SyncService {
    /// Build the service, restoring the enabled flag and last sync time from
    /// the settings file. Starts online with no credential.
    pub fn new(
        store: Arc<dyn DayStorage>,
        remote: Arc<dyn RemoteSnapshotStore>,
        auth: Arc<dyn AuthProvider>,
        settings: SyncSettingsRepository,
    ) -> Result<Self> {
        let persisted = settings.load()?;
        info!(
            "Sync service ready (enabled: {}, last sync: {:?})",
            persisted.enabled, persisted.last_sync_at
        );

        Ok(Self {
            inner: Arc::new(SyncInner {
                store,
                remote,
                auth,
                settings,
                state: Mutex::new(RuntimeState {
                    enabled: persisted.enabled,
                    online: true,
                    credential: None,
                    last_sync_at: persisted.last_sync_at,
                }),
                syncing: AtomicBool::new(false),
                pending: Mutex::new(PendingSync::default()),
            }),
        })
    }

    pub async fn get_sync_state(&self) -> SyncState {
        let state = self.inner.state.lock().await;
        SyncState {
            enabled: state.enabled,
            signed_in: state.valid_token(now_millis()).is_some(),
            online: state.online,
            syncing: self.inner.syncing.load(Ordering::Acquire),
            last_sync_at: state.last_sync_at,
        }
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<SyncState, SyncError> {
        {
            let mut state = self.inner.state.lock().await;
            state.enabled = enabled;
            self.persist(&state)?;
        }
        info!("Sync {}", if enabled { "enabled" } else { "disabled" });
        Ok(self.get_sync_state().await)
    }

    pub async fn set_online(&self, online: bool) -> SyncState {
        self.inner.state.lock().await.online = online;
        debug!("Network is now {}", if online { "online" } else { "offline" });
        self.get_sync_state().await
    }

    /// Accept a token obtained outside the service
    pub async fn set_token(&self, access_token: String, expires_in_secs: u64) -> SyncState {
        let credential = Credential::new(access_token, expires_in_secs, now_millis());
        self.inner.state.lock().await.credential = Some(credential);
        info!("Access token set, valid for {}s", expires_in_secs);
        self.get_sync_state().await
    }

    pub async fn sign_out(&self) -> SyncState {
        self.inner.state.lock().await.credential = None;
        info!("Signed out of backup");
        self.get_sync_state().await
    }

    /// Explicit user sign-in.
    ///
    /// Without `force_prompt` a silent attempt is made first and interaction
    /// is only requested when that fails.
    pub async fn sign_in(&self, force_prompt: bool) -> Result<SyncState, SyncError> {
        let auth = &self.inner.auth;
        let grant = if force_prompt {
            auth.acquire_token(AuthMode::Interactive { force_prompt: true }).await
        } else {
            match auth.acquire_token(AuthMode::Silent).await {
                Ok(grant) => Ok(grant),
                Err(e) => {
                    debug!("Silent sign-in failed ({}), asking for interaction", e);
                    auth.acquire_token(AuthMode::Interactive { force_prompt: false }).await
                }
            }
        };

        let grant = grant.map_err(|e| {
            warn!("Sign-in failed: {}", e);
            SyncError::from(e)
        })?;

        Ok(self.set_token(grant.access_token, grant.expires_in).await)
    }

    /// Best-effort silent token refresh, used at startup when sync is
    /// enabled. Returns whether a valid credential is held afterwards.
    pub async fn try_silent_refresh(&self) -> bool {
        {
            let state = self.inner.state.lock().await;
            if !state.enabled {
                return false;
            }
            if state.valid_token(now_millis()).is_some() {
                return true;
            }
        }

        match self.inner.auth.acquire_token(AuthMode::Silent).await {
            Ok(grant) => {
                self.set_token(grant.access_token, grant.expires_in).await;
                true
            }
            Err(e) => {
                warn!("Silent token refresh failed: {}", e);
                false
            }
        }
    }

    /// Run one full cycle now.
    pub async fn sync_now(&self, reason: &str) -> Result<SyncReport, SyncError> {
        let token = self.check_guards(true).await?;
        let _flight = self.begin_flight()?;

        info!("Sync started ({})", reason);
        match self.run_cycle(reason, &token).await {
            Ok(report) => {
                info!(
                    "Sync finished ({}): {} local, {} remote, {} merged, {} pulled",
                    reason, report.local_count, report.remote_count, report.merged_count, report.pulled_count
                );
                Ok(report)
            }
            Err(e) => {
                warn!("Sync failed ({}): {}", reason, e);
                Err(e)
            }
        }
    }

    /// Download the remote snapshot and merge it into the local store
    /// without uploading anything. Does not require sync to be enabled.
    pub async fn restore_now(&self) -> Result<RestoreReport, SyncError> {
        let token = self.check_guards(false).await?;
        let _flight = self.begin_flight()?;

        info!("Restore started");
        let remote = self.inner.remote.as_ref();
        let file_id = remote.find_or_create(&token).await?;
        let snapshot = RemoteSnapshot::parse_lenient(&remote.download(&token, &file_id).await?);

        let merged_count = self.inner.store.merge_many(&snapshot.days).await?;
        let now = now_millis();
        self.record_sync(now).await?;

        info!(
            "Restore finished: {} remote days, {} written locally",
            snapshot.days.len(),
            merged_count
        );
        Ok(RestoreReport {
            remote_count: snapshot.days.len(),
            merged_count,
            last_sync_at: now,
        })
    }

    /// Arm a debounced sync, replacing any pending one.
    ///
    /// Refuses without side effects when sync is disabled or no valid
    /// credential is held. Once the delay has elapsed the run is detached
    /// from the slot, so a later rearm cannot cancel a cycle in progress.
    pub async fn schedule_sync(&self, delay: Duration, reason: &str) -> Result<(), SyncError> {
        {
            let state = self.inner.state.lock().await;
            if !state.enabled {
                return Err(SyncError::Disabled);
            }
            if state.valid_token(now_millis()).is_none() {
                return Err(SyncError::NotAuthorized);
            }
        }

        let mut pending = self.inner.pending.lock().await;
        if let Some(previous) = pending.handle.take() {
            previous.abort();
            debug!("Replaced pending sync");
        }
        pending.generation += 1;
        let generation = pending.generation;

        debug!("Sync scheduled in {:?} ({})", delay, reason);

        let service = self.clone();
        let reason = reason.to_string();
        pending.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            service.detach_pending(generation).await;

            match service.sync_now(&reason).await {
                Ok(_) => {}
                Err(e) if e.is_guard() => debug!("Scheduled sync skipped ({}): {}", reason, e),
                Err(_) => {} // already logged by sync_now
            }
        }));

        Ok(())
    }

    /// Whether a debounced sync is armed and still waiting
    pub async fn has_pending_sync(&self) -> bool {
        self.inner.pending.lock().await.handle.is_some()
    }

    async fn detach_pending(&self, generation: u64) {
        let mut pending = self.inner.pending.lock().await;
        if pending.generation == generation {
            pending.handle = None;
        }
    }

    /// Guards in order: enabled (when required), online, credential.
    /// Returns the bearer token to use.
    async fn check_guards(&self, require_enabled: bool) -> Result<String, SyncError> {
        let state = self.inner.state.lock().await;
        if require_enabled && !state.enabled {
            return Err(SyncError::Disabled);
        }
        if !state.online {
            return Err(SyncError::Offline);
        }
        state.valid_token(now_millis()).ok_or(SyncError::NotAuthorized)
    }

    fn begin_flight(&self) -> Result<InFlight<'_>, SyncError> {
        self.inner
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SyncError::AlreadySyncing)?;
        Ok(InFlight(&self.inner.syncing))
    }

    async fn run_cycle(&self, reason: &str, token: &str) -> Result<SyncReport, SyncError> {
        let remote = self.inner.remote.as_ref();
        let store = self.inner.store.as_ref();

        let file_id = remote.find_or_create(token).await?;
        let snapshot = RemoteSnapshot::parse_lenient(&remote.download(token, &file_id).await?);

        let local = store.get_all().await?;
        let merged: Vec<DayRecord> = merge(&local, &snapshot.days)
            .into_iter()
            .map(DayRecord::with_recomputed_totals)
            .collect();

        let local_stamps: HashMap<&str, i64> =
            local.iter().map(|d| (d.date.as_str(), d.updated_at)).collect();
        let pulled_count = merged
            .iter()
            .filter(|d| local_stamps.get(d.date.as_str()).map_or(true, |ts| *ts < d.updated_at))
            .count();

        for record in &merged {
            store.put(record).await?;
        }

        let now = now_millis();
        let merged_count = merged.len();
        let body = RemoteSnapshot::new(merged, now).to_json()?;
        remote.upload(token, &file_id, &body).await?;

        self.record_sync(now).await?;

        Ok(SyncReport {
            reason: reason.to_string(),
            local_count: local.len(),
            remote_count: snapshot.days.len(),
            merged_count,
            pulled_count,
            last_sync_at: now,
        })
    }

    async fn record_sync(&self, at: i64) -> Result<(), SyncError> {
        let mut state = self.inner.state.lock().await;
        state.last_sync_at = Some(at);
        self.persist(&state)?;
        Ok(())
    }

    fn persist(&self, state: &RuntimeState) -> Result<()> {
        self.inner.settings.save(&SyncSettings {
            enabled: state.enabled,
            last_sync_at: state.last_sync_at,
        })
    }
}
