use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use super::{RemoteError, RemoteSnapshotStore};

const MEMORY_FILE_ID: &str = "memory-backup";

/// In-memory backup store used by tests.
///
/// Counts every call so tests can assert that guarded paths never touch the
/// network, and can be told to fail or to hold a download open.
#[derive(Clone, Default)]
pub struct InMemoryRemoteStore {
    content: Arc<Mutex<Option<String>>>,
    calls: Arc<AtomicUsize>,
    failure: Arc<Mutex<Option<u16>>>,
    download_gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_content(&self, body: impl Into<String>) {
        *self.content.lock().await = Some(body.into());
    }

    pub async fn content(&self) -> Option<String> {
        self.content.lock().await.clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every following call fail with the given HTTP status
    /// (401 and 403 surface as `Unauthorized`). `None` clears it.
    pub async fn fail_with(&self, status: Option<u16>) {
        *self.failure.lock().await = status;
    }

    /// Block downloads until the returned handle is notified
    pub async fn hold_downloads(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.download_gate.lock().await = Some(gate.clone());
        gate
    }

    async fn enter(&self) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match *self.failure.lock().await {
            Some(401) | Some(403) => Err(RemoteError::Unauthorized),
            Some(status) => Err(RemoteError::Status(status, "injected failure".to_string())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteSnapshotStore for InMemoryRemoteStore {
    async fn find_or_create(&self, _token: &str) -> Result<String, RemoteError> {
        self.enter().await?;
        let mut content = self.content.lock().await;
        if content.is_none() {
            *content = Some(String::new());
        }
        Ok(MEMORY_FILE_ID.to_string())
    }

    async fn download(&self, _token: &str, _file_id: &str) -> Result<String, RemoteError> {
        self.enter().await?;
        let gate = self.download_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(self.content.lock().await.clone().unwrap_or_default())
    }

    async fn upload(&self, _token: &str, _file_id: &str, body: &str) -> Result<(), RemoteError> {
        self.enter().await?;
        *self.content.lock().await = Some(body.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_creates_empty_file() {
        let store = InMemoryRemoteStore::new();
        assert_eq!(store.content().await, None);

        let id = store.find_or_create("t").await.unwrap();
        assert_eq!(store.content().await, Some(String::new()));
        assert_eq!(store.download("t", &id).await.unwrap(), "");
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = InMemoryRemoteStore::new();
        store.fail_with(Some(401)).await;
        assert!(matches!(store.find_or_create("t").await, Err(RemoteError::Unauthorized)));

        store.fail_with(Some(500)).await;
        assert!(matches!(store.upload("t", "x", "{}").await, Err(RemoteError::Status(500, _))));

        store.fail_with(None).await;
        store.upload("t", "x", "{}").await.unwrap();
        assert_eq!(store.content().await.as_deref(), Some("{}"));
    }
}
