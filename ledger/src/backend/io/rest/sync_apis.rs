//! # REST API for Backup Sync
//!
//! State, settings and manual triggers for the backup driver.

use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{
    ScheduleSyncRequest, SetOnlineRequest, SetSyncEnabledRequest, SetTokenRequest, SignInRequest, SyncNowRequest,
};

use crate::backend::io::rest::mappers::SyncMapper;
use crate::backend::io::rest::sync_error_response;
use crate::backend::AppState;

const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// Create a router for sync related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/state", get(get_sync_state))
        .route("/now", post(sync_now))
        .route("/schedule", post(schedule_sync))
        .route("/restore", post(restore_now))
        .route("/enabled", post(set_enabled).put(set_enabled))
        .route("/online", post(set_online).put(set_online))
        .route("/sign-in", post(sign_in))
        .route("/token", post(set_token))
        .route("/sign-out", post(sign_out))
}

pub async fn get_sync_state(State(state): State<AppState>) -> impl IntoResponse {
    let sync_state = state.sync_service.get_sync_state().await;
    Json(SyncMapper::to_state_response(sync_state))
}

pub async fn sync_now(
    State(state): State<AppState>,
    request: Option<Json<SyncNowRequest>>,
) -> impl IntoResponse {
    let reason = request
        .and_then(|Json(r)| r.reason)
        .unwrap_or_else(|| "manual".to_string());
    info!("POST /api/sync/now - reason: {}", reason);

    match state.sync_service.sync_now(&reason).await {
        Ok(report) => (StatusCode::OK, Json(SyncMapper::to_report_response(report))).into_response(),
        Err(e) => sync_error_response(e),
    }
}

pub async fn schedule_sync(
    State(state): State<AppState>,
    request: Option<Json<ScheduleSyncRequest>>,
) -> impl IntoResponse {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let delay = request.delay_ms.map(Duration::from_millis).unwrap_or(state.sync_delay);
    let reason = request.reason.unwrap_or_else(|| "scheduled".to_string());
    info!("POST /api/sync/schedule - {:?} ({})", delay, reason);

    match state.sync_service.schedule_sync(delay, &reason).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => sync_error_response(e),
    }
}

pub async fn restore_now(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/sync/restore");

    match state.sync_service.restore_now().await {
        Ok(report) => (StatusCode::OK, Json(SyncMapper::to_restore_response(report))).into_response(),
        Err(e) => sync_error_response(e),
    }
}

pub async fn set_enabled(
    State(state): State<AppState>,
    Json(request): Json<SetSyncEnabledRequest>,
) -> impl IntoResponse {
    info!("PUT /api/sync/enabled - {}", request.enabled);

    match state.sync_service.set_enabled(request.enabled).await {
        Ok(sync_state) => (StatusCode::OK, Json(SyncMapper::to_state_response(sync_state))).into_response(),
        Err(e) => sync_error_response(e),
    }
}

pub async fn set_online(
    State(state): State<AppState>,
    Json(request): Json<SetOnlineRequest>,
) -> impl IntoResponse {
    info!("PUT /api/sync/online - {}", request.online);
    let sync_state = state.sync_service.set_online(request.online).await;
    Json(SyncMapper::to_state_response(sync_state))
}

pub async fn sign_in(
    State(state): State<AppState>,
    request: Option<Json<SignInRequest>>,
) -> impl IntoResponse {
    let force_prompt = request.map(|Json(r)| r.force_prompt).unwrap_or(false);
    info!("POST /api/sync/sign-in - force_prompt: {}", force_prompt);

    match state.sync_service.sign_in(force_prompt).await {
        Ok(sync_state) => (StatusCode::OK, Json(SyncMapper::to_state_response(sync_state))).into_response(),
        Err(e) => sync_error_response(e),
    }
}

pub async fn set_token(
    State(state): State<AppState>,
    Json(request): Json<SetTokenRequest>,
) -> impl IntoResponse {
    info!("POST /api/sync/token");
    let expires_in = request.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    let sync_state = state.sync_service.set_token(request.access_token, expires_in).await;
    Json(SyncMapper::to_state_response(sync_state))
}

pub async fn sign_out(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/sync/sign-out");
    let sync_state = state.sync_service.sign_out().await;
    Json(SyncMapper::to_state_response(sync_state))
}
