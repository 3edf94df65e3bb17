//! # REST API for Period Summaries

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};
use shared::SummaryRequest;

use crate::backend::domain::commands::summary::SummaryQuery;
use crate::backend::domain::models::draft::parse_date;
use crate::backend::io::rest::error_response;
use crate::backend::io::rest::mappers::SummaryMapper;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_summary))
}

/// Totals for `period` (week, month, year, all) ending at `until`
pub async fn get_summary(
    State(state): State<AppState>,
    Query(request): Query<SummaryRequest>,
) -> impl IntoResponse {
    info!("GET /api/summary - query: {:?}", request);

    let until = match request.until.as_deref().map(parse_date).transpose() {
        Ok(until) => until,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "invalid_date", e.to_string()),
    };

    let query = SummaryQuery {
        period: SummaryMapper::period_to_domain(request.period),
        until,
    };

    match state.summary_service.summarize(query).await {
        Ok(result) => (StatusCode::OK, Json(SummaryMapper::to_response(result))).into_response(),
        Err(e) => {
            error!("Failed to summarize: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::domain::models::day::{DayRecord, Expense};
    use crate::backend::io::rest::test_support::{json, send, test_app};
    use crate::backend::storage::DayStorage;
    use axum::http::StatusCode;
    use shared::{SummaryPeriod, SummaryResponse};

    #[tokio::test]
    async fn test_month_summary() {
        let app = test_app();
        app.repo
            .put(&DayRecord::new("2024-03-01", 150.0, 20.0, 0.0, vec![Expense::new("fuel", 30.0)], "", 1))
            .await
            .unwrap();
        app.repo
            .put(&DayRecord::new("2024-02-29", 999.0, 0.0, 0.0, vec![], "", 1))
            .await
            .unwrap();

        let (status, bytes) = send(&app, "GET", "/api/summary?period=month&until=2024-03-14", None).await;
        assert_eq!(status, StatusCode::OK);
        let summary: SummaryResponse = json(&bytes);
        assert_eq!(summary.period, SummaryPeriod::Month);
        assert_eq!(summary.start.as_deref(), Some("2024-03-01"));
        assert_eq!(summary.until, "2024-03-14");
        assert_eq!(summary.count, 1);
        assert_eq!(summary.net, 140.0);

        let (_, bytes) = send(&app, "GET", "/api/summary?period=all&until=2024-03-14", None).await;
        let summary: SummaryResponse = json(&bytes);
        assert_eq!(summary.start, None);
        assert_eq!(summary.count, 2);
    }

    #[tokio::test]
    async fn test_bad_until_is_400() {
        let app = test_app();
        let (status, _) = send(&app, "GET", "/api/summary?until=14.03.2024", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
