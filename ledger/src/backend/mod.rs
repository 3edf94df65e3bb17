//! # Backend Module
//!
//! Contains all non-UI logic for the taxi ledger.
//!
//! ## Architecture
//!
//! ```text
//! HTTP clients
//!     ↓
//! IO Layer (REST API, handlers, DTO mappers)
//!     ↓
//! Domain Layer (days, merge, sync, summary, export)
//!     ↓
//! Storage Layer (SQLite day store, settings file, Drive backup)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Build the application state from a [`LedgerConfig`]
//! - Set up the REST API router with CORS
//! - Refresh the backup credential silently at startup when sync is enabled

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{http::Method, Router};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::backend::domain::{DayService, ExportService, SummaryService, SyncService};
use crate::backend::storage::remote::{AuthProvider, DriveAppDataStore, OAuthRefreshProvider, UnconfiguredAuth};
use crate::backend::storage::{DayRepository, DayStorage, DbConnection, SyncSettingsRepository};

pub use config::LedgerConfig;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub day_service: DayService,
    pub summary_service: SummaryService,
    pub export_service: ExportService,
    pub sync_service: SyncService,
    /// Debounce delay for the backup armed after each edit
    pub sync_delay: Duration,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &LedgerConfig) -> Result<AppState> {
    info!("Setting up database in {}", config.data_dir.display());
    let db_conn = DbConnection::init(&config.data_dir).await?;
    let store: Arc<dyn DayStorage> = Arc::new(DayRepository::new(db_conn));

    info!("Setting up backup sync");
    let http = reqwest::Client::new();
    let auth: Arc<dyn AuthProvider> = match config.drive_credentials() {
        Some(creds) => Arc::new(OAuthRefreshProvider::new(
            http.clone(),
            creds.client_id.clone(),
            creds.client_secret.clone(),
            creds.refresh_token.clone(),
        )),
        None => {
            info!("No Drive credentials configured; tokens must be supplied via /api/sync/token");
            Arc::new(UnconfiguredAuth)
        }
    };
    let sync_service = SyncService::new(
        store.clone(),
        Arc::new(DriveAppDataStore::new(http)),
        auth,
        SyncSettingsRepository::new(&config.data_dir),
    )?;

    if sync_service.try_silent_refresh().await {
        info!("Backup credential ready");
    }

    info!("Setting up application state");
    Ok(AppState {
        day_service: DayService::new(store.clone()),
        summary_service: SummaryService::new(store.clone()),
        export_service: ExportService::new(store),
        sync_service,
        sync_delay: config.sync_delay(),
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .nest("/api", io::api_router())
        .layer(cors)
        .with_state(app_state)
}
