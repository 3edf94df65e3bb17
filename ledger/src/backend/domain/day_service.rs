//! Day service domain logic for the ledger.
//!
//! Saving goes through a [`DayDraft`]: the draft is coerced into a record,
//! derived totals are computed, and `updated_at` is stamped so that it never
//! moves backwards for a date.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use log::{debug, info};

use crate::backend::domain::commands::days::{
    DayListQuery, DayListResult, DeleteDayResult, SaveDayCommand, SaveDayResult,
};
use crate::backend::domain::models::day::{sort_newest_first, DayRecord};
use crate::backend::domain::models::draft::{parse_date, DayDraft, DraftError};
use crate::backend::storage::DayStorage;

#[derive(Debug, thiserror::Error)]
pub enum DayError {
    #[error(transparent)]
    InvalidDraft(#[from] DraftError),
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct DayService {
    store: Arc<dyn DayStorage>,
}

impl DayService {
    pub fn new(store: Arc<dyn DayStorage>) -> Self {
        Self { store }
    }

    pub async fn get_day(&self, date: &str) -> Result<Option<DayRecord>, DayError> {
        let date = canonical_date(date)?;
        Ok(self.store.get(&date).await?)
    }

    /// All days, newest first, optionally narrowed by a history filter
    pub async fn list_days(&self, query: DayListQuery) -> Result<DayListResult> {
        let mut days = self.store.get_all().await?;
        if let Some(filter) = query.filter.as_deref() {
            days.retain(|d| d.matches_filter(filter));
        }
        sort_newest_first(&mut days);
        debug!("Listed {} days", days.len());
        Ok(DayListResult { days })
    }

    /// Editable form state for a date: the stored day, or an empty draft
    pub async fn load_draft(&self, date: &str) -> Result<DayDraft, DayError> {
        let date = canonical_date(date)?;
        Ok(match self.store.get(&date).await? {
            Some(record) => DayDraft::from_record(&record),
            None => DayDraft::for_date(date),
        })
    }

    pub async fn save_draft(&self, command: SaveDayCommand) -> Result<SaveDayResult, DayError> {
        self.save_draft_at(command, Utc::now().timestamp_millis(), Local::now().date_naive())
            .await
    }

    /// [`save_draft`](Self::save_draft) with an explicit clock
    pub async fn save_draft_at(
        &self,
        command: SaveDayCommand,
        now_millis: i64,
        today: NaiveDate,
    ) -> Result<SaveDayResult, DayError> {
        let mut record = command.draft.to_record(today, now_millis)?;

        let previous = self.store.get(&record.date).await?;
        if let Some(prev) = &previous {
            record.updated_at = record.updated_at.max(prev.updated_at);
        }
        let created = previous.is_none();

        self.store.put(&record).await?;
        info!(
            "Saved day {} (net {:.2}, {} expenses)",
            record.date,
            record.net,
            record.expenses.len()
        );

        let success_message = if created {
            format!("Day {} created", record.date)
        } else {
            format!("Day {} updated", record.date)
        };

        Ok(SaveDayResult {
            day: record,
            created,
            success_message,
        })
    }

    pub async fn delete_day(&self, date: &str) -> Result<DeleteDayResult, DayError> {
        let date = canonical_date(date)?;
        let existed = self.store.get(&date).await?.is_some();
        self.store.delete(&date).await?;

        let success_message = if existed {
            info!("Deleted day {}", date);
            format!("Day {} deleted", date)
        } else {
            format!("Day {} was not recorded", date)
        };

        Ok(DeleteDayResult {
            date,
            existed,
            success_message,
        })
    }
}

/// Zero-padded `YYYY-MM-DD` key for a user-supplied date
fn canonical_date(date: &str) -> Result<String, DraftError> {
    Ok(parse_date(date)?.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::day::Expense;
    use crate::backend::storage::InMemoryDayRepository;

    fn setup() -> (DayService, InMemoryDayRepository) {
        let repo = InMemoryDayRepository::new();
        (DayService::new(Arc::new(repo.clone())), repo)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn draft(date: &str, revenue: &str) -> DayDraft {
        DayDraft {
            revenue: revenue.to_string(),
            ..DayDraft::for_date(date)
        }
    }

    #[tokio::test]
    async fn test_save_computes_totals() {
        let (service, _) = setup();
        let mut d = draft("2024-03-01", "150");
        d.tip1 = "20".to_string();
        d.add_expense("fuel", "30");

        let result = service
            .save_draft_at(SaveDayCommand { draft: d }, 1_000, today())
            .await
            .unwrap();

        assert!(result.created);
        assert_eq!(result.day.gross, 170.0);
        assert_eq!(result.day.expenses_total, 30.0);
        assert_eq!(result.day.net, 140.0);

        let all = service.list_days(DayListQuery::default()).await.unwrap().days;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], result.day);
    }

    #[tokio::test]
    async fn test_save_without_date_uses_today() {
        let (service, _) = setup();
        let d = DayDraft {
            revenue: "12,5".to_string(),
            ..Default::default()
        };

        let result = service
            .save_draft_at(SaveDayCommand { draft: d }, 1, today())
            .await
            .unwrap();
        assert_eq!(result.day.date, "2024-03-10");
        assert_eq!(result.day.revenue, 12.5);
    }

    #[tokio::test]
    async fn test_resave_replaces_and_keeps_timestamp_monotonic() {
        let (service, _) = setup();
        service
            .save_draft_at(SaveDayCommand { draft: draft("2024-03-01", "100") }, 5_000, today())
            .await
            .unwrap();

        // Clock went backwards between saves
        let result = service
            .save_draft_at(SaveDayCommand { draft: draft("2024-03-01", "80") }, 4_000, today())
            .await
            .unwrap();

        assert!(!result.created);
        assert_eq!(result.day.revenue, 80.0);
        assert_eq!(result.day.updated_at, 5_000);
    }

    #[tokio::test]
    async fn test_invalid_date_rejected() {
        let (service, repo) = setup();
        let err = service
            .save_draft_at(SaveDayCommand { draft: draft("03/01/2024", "1") }, 1, today())
            .await
            .unwrap_err();

        assert!(matches!(err, DayError::InvalidDraft(DraftError::InvalidDate(_))));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let (service, repo) = setup();
        for (date, note) in [("2024-01-05", "Airport run"), ("2024-02-01", ""), ("2024-01-20", "airport")] {
            repo.put(&DayRecord::new(date, 1.0, 0.0, 0.0, vec![], note, 1))
                .await
                .unwrap();
        }

        let all = service.list_days(DayListQuery::default()).await.unwrap().days;
        let dates: Vec<&str> = all.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-02-01", "2024-01-20", "2024-01-05"]);

        let filtered = service
            .list_days(DayListQuery { filter: Some("AIRPORT".to_string()) })
            .await
            .unwrap()
            .days;
        assert_eq!(filtered.len(), 2);

        let by_month = service
            .list_days(DayListQuery { filter: Some("2024-01".to_string()) })
            .await
            .unwrap()
            .days;
        assert_eq!(by_month.len(), 2);
    }

    #[tokio::test]
    async fn test_load_draft_existing_and_missing() {
        let (service, repo) = setup();
        let empty = service.load_draft("2024-05-05").await.unwrap();
        assert_eq!(empty, DayDraft::for_date("2024-05-05"));

        repo.put(&DayRecord::new("2024-05-06", 42.0, 0.0, 0.0, vec![Expense::new("fuel", 8.0)], "late shift", 1))
            .await
            .unwrap();
        let loaded = service.load_draft("2024-05-06").await.unwrap();
        assert_eq!(loaded.revenue, "42");
        assert_eq!(loaded.note, "late shift");

        assert!(service.load_draft("yesterday").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (service, repo) = setup();
        repo.put(&DayRecord::new("2024-01-01", 1.0, 0.0, 0.0, vec![], "", 1))
            .await
            .unwrap();

        assert!(service.delete_day("2024-01-01").await.unwrap().existed);
        assert!(!service.delete_day("2024-01-01").await.unwrap().existed);
        assert!(service.get_day("2024-01-01").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unpadded_dates_address_the_same_day() {
        let (service, repo) = setup();
        service
            .save_draft_at(SaveDayCommand { draft: draft("2024-3-1", "150") }, 1, today())
            .await
            .unwrap();
        assert!(repo.get("2024-03-01").await.unwrap().is_some());

        let day = service.get_day("2024-3-1").await.unwrap().unwrap();
        assert_eq!(day.date, "2024-03-01");

        let deleted = service.delete_day(" 2024-3-1 ").await.unwrap();
        assert!(deleted.existed);
        assert_eq!(deleted.date, "2024-03-01");
        assert!(repo.is_empty().await);

        assert!(matches!(
            service.get_day("1.3.2024").await,
            Err(DayError::InvalidDraft(DraftError::InvalidDate(_)))
        ));
        assert!(service.delete_day("1.3.2024").await.is_err());
    }
}
