//! Export of all stored days as a JSON backup or a CSV sheet.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use serde::Serialize;

use crate::backend::domain::commands::export::ExportResult;
use crate::backend::domain::models::day::{sort_newest_first, DayRecord};
use crate::backend::storage::{DayStorage, RemoteSnapshot};

pub const JSON_EXPORT_FILE: &str = "taxi-ledger-backup.json";
pub const CSV_EXPORT_FILE: &str = "taxi-ledger.csv";

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: &'a str,
    revenue: f64,
    tip1: f64,
    tip2: f64,
    expenses_total: f64,
    gross: f64,
    net: f64,
    note: &'a str,
    expenses: String,
    updated_at: i64,
}

/// `label:amount; label:amount`
fn flatten_expenses(day: &DayRecord) -> String {
    day.expenses
        .iter()
        .map(|e| format!("{}:{}", e.label, e.amount))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Clone)]
pub struct ExportService {
    store: Arc<dyn DayStorage>,
}

impl ExportService {
    pub fn new(store: Arc<dyn DayStorage>) -> Self {
        Self { store }
    }

    async fn sorted_days(&self) -> Result<Vec<DayRecord>> {
        let mut days: Vec<DayRecord> = self
            .store
            .get_all()
            .await?
            .into_iter()
            .map(DayRecord::with_recomputed_totals)
            .collect();
        sort_newest_first(&mut days);
        Ok(days)
    }

    /// Same document shape as the remote backup, so it can be restored from
    pub async fn export_json(&self) -> Result<ExportResult> {
        let days = self.sorted_days().await?;
        let record_count = days.len();
        let content = RemoteSnapshot::new(days, Utc::now().timestamp_millis()).to_json_pretty()?;

        info!("Exported {} days as JSON", record_count);
        Ok(ExportResult {
            file_name: JSON_EXPORT_FILE.to_string(),
            content_type: "application/json",
            content,
            record_count,
        })
    }

    pub async fn export_csv(&self) -> Result<ExportResult> {
        let days = self.sorted_days().await?;

        let mut wtr = csv::Writer::from_writer(Vec::new());
        for day in &days {
            wtr.serialize(CsvRow {
                date: &day.date,
                revenue: day.revenue,
                tip1: day.tip1,
                tip2: day.tip2,
                expenses_total: day.expenses_total,
                gross: day.gross,
                net: day.net,
                note: &day.note,
                expenses: flatten_expenses(day),
                updated_at: day.updated_at,
            })?;
        }
        let bytes = wtr.into_inner().context("Failed to flush CSV export")?;
        let content = String::from_utf8(bytes).context("CSV export is not valid UTF-8")?;

        info!("Exported {} days as CSV", days.len());
        Ok(ExportResult {
            file_name: CSV_EXPORT_FILE.to_string(),
            content_type: "text/csv",
            content,
            record_count: days.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::day::Expense;
    use crate::backend::storage::InMemoryDayRepository;

    async fn setup() -> ExportService {
        let repo = InMemoryDayRepository::new();
        repo.put(&DayRecord::new(
            "2024-03-01",
            150.0,
            20.0,
            0.0,
            vec![Expense::new("fuel", 30.0), Expense::new("wash", 7.5)],
            "busy, long day",
            9,
        ))
        .await
        .unwrap();
        repo.put(&DayRecord::new("2024-03-02", 80.0, 0.0, 0.0, vec![], "", 10))
            .await
            .unwrap();
        ExportService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_json_export_is_a_readable_snapshot() {
        let service = setup().await;
        let export = service.export_json().await.unwrap();
        assert_eq!(export.record_count, 2);

        let parsed = RemoteSnapshot::parse_lenient(&export.content);
        assert_eq!(parsed.app, "TaxiLedger");
        assert_eq!(parsed.days.len(), 2);
        assert_eq!(parsed.days[0].date, "2024-03-02");
        assert_eq!(parsed.days[1].net, 132.5);
    }

    #[tokio::test]
    async fn test_csv_export() {
        let service = setup().await;
        let export = service.export_csv().await.unwrap();
        let mut lines = export.content.lines();

        assert_eq!(
            lines.next().unwrap(),
            "date,revenue,tip1,tip2,expenses_total,gross,net,note,expenses,updated_at"
        );
        assert_eq!(lines.next().unwrap(), "2024-03-02,80.0,0.0,0.0,0.0,80.0,80.0,,,10");
        assert_eq!(
            lines.next().unwrap(),
            "2024-03-01,150.0,20.0,0.0,37.5,170.0,132.5,\"busy, long day\",fuel:30; wash:7.5,9"
        );
        assert!(lines.next().is_none());
    }
}
