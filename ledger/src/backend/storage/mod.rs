//! # Storage Module
//!
//! Handles persistence for the ledger: the local day store and the remote
//! backup file.
//!
//! The domain layer only sees the `DayStorage` and `RemoteSnapshotStore`
//! traits, so the SQLite store can be swapped for the in-memory one in tests
//! and the Drive store for an in-memory fake.
//!
//! ## Layout
//!
//! - **connection**: SQLite pool setup and schema
//! - **repositories**: `DayStorage` implementations and the sync settings file
//! - **remote**: backup file format, Drive client and token providers
//! - **traits**: the storage seams the domain depends on

pub mod connection;
pub mod remote;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use remote::{InMemoryRemoteStore, RemoteError, RemoteSnapshot, RemoteSnapshotStore};
pub use repositories::{DayRepository, InMemoryDayRepository, SyncSettingsRepository};
pub use traits::DayStorage;
