//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the ledger. This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Error translation from domain to HTTP status codes
//! - Scheduling a debounced backup after edits
//!
//! ## Error Mapping
//!
//! | Domain error | Status |
//! |---|---|
//! | invalid draft | 400 |
//! | not authorized | 401 |
//! | sync disabled, offline, already syncing | 409 |
//! | local storage | 500 |
//! | remote transport | 502 |

pub mod day_apis;
pub mod export_apis;
pub mod mappers;
pub mod summary_apis;
pub mod sync_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Router,
};
use log::{debug, warn};
use shared::ErrorResponse;

use crate::backend::domain::models::sync::SyncError;
use crate::backend::AppState;

/// All API routes, to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/days", day_apis::router())
        .nest("/sync", sync_apis::router())
        .nest("/summary", summary_apis::router())
        .nest("/export", export_apis::router())
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error: error.to_string(),
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

pub(crate) fn sync_error_response(err: SyncError) -> Response {
    let (status, code) = match &err {
        SyncError::NotAuthorized => (StatusCode::UNAUTHORIZED, "not_authorized"),
        SyncError::Disabled => (StatusCode::CONFLICT, "sync_disabled"),
        SyncError::Offline => (StatusCode::CONFLICT, "offline"),
        SyncError::AlreadySyncing => (StatusCode::CONFLICT, "already_syncing"),
        SyncError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        SyncError::Transport(_) => (StatusCode::BAD_GATEWAY, "transport_error"),
    };
    error_response(status, code, err.to_string())
}

/// Arm the debounced backup after a local edit. Best effort: a refusal is
/// logged and never fails the edit itself.
pub(crate) async fn schedule_autosync(state: &AppState, reason: &str) {
    match state.sync_service.schedule_sync(state.sync_delay, reason).await {
        Ok(()) => {}
        Err(e) if e.is_guard() => debug!("Autosync not scheduled ({}): {}", reason, e),
        Err(e) => warn!("Autosync scheduling failed ({}): {}", reason, e),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde::de::DeserializeOwned;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::backend::domain::{DayService, ExportService, SummaryService, SyncService};
    use crate::backend::storage::remote::UnconfiguredAuth;
    use crate::backend::storage::{InMemoryDayRepository, InMemoryRemoteStore, SyncSettingsRepository};
    use crate::backend::{create_router, AppState};

    pub struct TestApp {
        pub router: Router,
        pub state: AppState,
        pub repo: InMemoryDayRepository,
        pub remote: InMemoryRemoteStore,
        _dir: TempDir,
    }

    pub fn test_app() -> TestApp {
        let dir = TempDir::new().unwrap();
        let repo = InMemoryDayRepository::new();
        let remote = InMemoryRemoteStore::new();
        let store = Arc::new(repo.clone());

        let sync_service = SyncService::new(
            store.clone(),
            Arc::new(remote.clone()),
            Arc::new(UnconfiguredAuth),
            SyncSettingsRepository::new(dir.path()),
        )
        .unwrap();

        let state = AppState {
            day_service: DayService::new(store.clone()),
            summary_service: SummaryService::new(store.clone()),
            export_service: ExportService::new(store),
            sync_service,
            sync_delay: Duration::from_millis(20),
        };

        TestApp {
            router: create_router(state.clone()),
            state,
            repo,
            remote,
            _dir: dir,
        }
    }

    /// Send one request; returns the status and the raw body
    pub async fn send(app: &TestApp, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub fn json<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }
}
