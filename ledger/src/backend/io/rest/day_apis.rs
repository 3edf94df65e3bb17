//! # REST API for Days
//!
//! Listing, reading, saving and deleting ledger days. Saving and deleting arm
//! the debounced backup.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};
use shared::{DayDraft, DayListRequest, DayListResponse, SaveDayResponse};

use crate::backend::domain::commands::days::{DayListQuery, SaveDayCommand};
use crate::backend::domain::day_service::DayError;
use crate::backend::io::rest::mappers::DayMapper;
use crate::backend::io::rest::{error_response, schedule_autosync};
use crate::backend::AppState;

/// Create a router for day related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_days))
        .route("/:date", get(get_day).put(save_day).delete(delete_day))
        .route("/:date/draft", get(get_draft))
}

/// List days, newest first, optionally filtered by `q`
pub async fn list_days(
    State(state): State<AppState>,
    Query(request): Query<DayListRequest>,
) -> impl IntoResponse {
    info!("GET /api/days - query: {:?}", request);

    let query = DayListQuery { filter: request.q };
    match state.day_service.list_days(query).await {
        Ok(result) => {
            let response = DayListResponse {
                days: DayMapper::to_dto_list(result.days),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list days: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string())
        }
    }
}

pub async fn get_day(State(state): State<AppState>, Path(date): Path<String>) -> impl IntoResponse {
    info!("GET /api/days/{}", date);

    match state.day_service.get_day(&date).await {
        Ok(Some(day)) => (StatusCode::OK, Json(DayMapper::to_dto(day))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", format!("No record for {}", date)),
        Err(e) => day_error_response(e),
    }
}

/// Form state for a date: the stored day or an empty draft
pub async fn get_draft(State(state): State<AppState>, Path(date): Path<String>) -> impl IntoResponse {
    info!("GET /api/days/{}/draft", date);

    match state.day_service.load_draft(&date).await {
        Ok(draft) => (StatusCode::OK, Json(DayMapper::draft_to_dto(draft))).into_response(),
        Err(e) => day_error_response(e),
    }
}

/// Save a day from its form values. The date in the path wins over any date
/// in the body.
pub async fn save_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(mut draft): Json<DayDraft>,
) -> impl IntoResponse {
    info!("PUT /api/days/{}", date);

    draft.date = Some(date);
    let command = SaveDayCommand {
        draft: DayMapper::draft_to_domain(draft),
    };

    match state.day_service.save_draft(command).await {
        Ok(result) => {
            schedule_autosync(&state, "save").await;

            let status = if result.created { StatusCode::CREATED } else { StatusCode::OK };
            let response = SaveDayResponse {
                day: DayMapper::to_dto(result.day),
                created: result.created,
                success_message: result.success_message,
            };
            (status, Json(response)).into_response()
        }
        Err(e) => day_error_response(e),
    }
}

pub async fn delete_day(State(state): State<AppState>, Path(date): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/days/{}", date);

    match state.day_service.delete_day(&date).await {
        Ok(_) => {
            schedule_autosync(&state, "delete").await;
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => day_error_response(e),
    }
}

fn day_error_response(err: DayError) -> axum::response::Response {
    match err {
        DayError::InvalidDraft(e) => error_response(StatusCode::BAD_REQUEST, "invalid_draft", e.to_string()),
        DayError::Storage(e) => {
            error!("Day storage failure: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string())
        }
    }
}
