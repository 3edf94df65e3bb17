//! # REST API for Data Export
//!
//! Downloads of all recorded days as a JSON backup or a CSV sheet.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use log::{error, info};

use crate::backend::domain::commands::export::ExportResult;
use crate::backend::io::rest::error_response;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/json", get(export_json))
        .route("/csv", get(export_csv))
}

fn attachment(export: ExportResult) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.content,
    )
        .into_response()
}

pub async fn export_json(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/json");

    match state.export_service.export_json().await {
        Ok(export) => attachment(export),
        Err(e) => {
            error!("JSON export failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", e.to_string())
        }
    }
}

pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/csv");

    match state.export_service.export_csv().await {
        Ok(export) => attachment(export),
        Err(e) => {
            error!("CSV export failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::domain::models::day::DayRecord;
    use crate::backend::io::rest::test_support::{send, test_app};
    use crate::backend::storage::{DayStorage, RemoteSnapshot};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_exports() {
        let app = test_app();
        app.repo
            .put(&DayRecord::new("2024-03-01", 150.0, 0.0, 0.0, vec![], "", 1))
            .await
            .unwrap();

        let (status, bytes) = send(&app, "GET", "/api/export/json", None).await;
        assert_eq!(status, StatusCode::OK);
        let snapshot = RemoteSnapshot::parse_lenient(&String::from_utf8(bytes).unwrap());
        assert_eq!(snapshot.days.len(), 1);

        let (status, bytes) = send(&app, "GET", "/api/export/csv", None).await;
        assert_eq!(status, StatusCode::OK);
        let csv = String::from_utf8(bytes).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.lines().nth(1).unwrap().starts_with("2024-03-01,150.0"));
    }
}
