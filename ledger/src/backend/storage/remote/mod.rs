//! # Remote Backup Storage
//!
//! The backup lives in a single JSON file in the app-private area of a cloud
//! file store. There is no per-record addressing: the whole snapshot is
//! downloaded and uploaded as one blob.
//!
//! - **snapshot**: the file format and its lenient parser
//! - **drive**: Google Drive `appDataFolder` implementation
//! - **auth**: bearer-token providers
//! - **memory**: in-memory store for tests

use async_trait::async_trait;

pub mod auth;
pub mod drive;
pub mod memory;
pub mod snapshot;

pub use auth::{AuthError, AuthMode, AuthProvider, OAuthRefreshProvider, TokenGrant, UnconfiguredAuth};
pub use drive::DriveAppDataStore;
pub use memory::InMemoryRemoteStore;
pub use snapshot::RemoteSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Remote store rejected the credential")]
    Unauthorized,
    #[error("Remote store returned {0}: {1}")]
    Status(u16, String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Access to the single backup file, authorized per call with a bearer token
#[async_trait]
pub trait RemoteSnapshotStore: Send + Sync {
    /// Locate the backup file, creating an empty one when missing.
    /// Returns the file id.
    async fn find_or_create(&self, token: &str) -> Result<String, RemoteError>;

    /// Fetch the raw file content
    async fn download(&self, token: &str, file_id: &str) -> Result<String, RemoteError>;

    /// Overwrite the file content in one write
    async fn upload(&self, token: &str, file_id: &str, body: &str) -> Result<(), RemoteError>;
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[cfg(test)]
pub(crate) async fn spawn_test_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
