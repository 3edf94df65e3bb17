//! SQLite-backed day store. One row per date in the `days` table; the
//! expense lines are kept as a JSON array in the `expenses` column.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::domain::models::day::{DayRecord, Expense};
use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::traits::DayStorage;

/// Repository for day records
#[derive(Clone)]
pub struct DayRepository {
    db: DbConnection,
}

impl DayRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_day(row: &SqliteRow) -> Result<DayRecord> {
        let date: String = row.get("date");
        let expenses_json: String = row.get("expenses");
        let expenses: Vec<Expense> = serde_json::from_str(&expenses_json)
            .with_context(|| format!("Corrupt expenses column for {}", date))?;

        Ok(DayRecord {
            date,
            revenue: row.get("revenue"),
            tip1: row.get("tip1"),
            tip2: row.get("tip2"),
            expenses,
            expenses_total: row.get("expenses_total"),
            gross: row.get("gross"),
            net: row.get("net"),
            note: row.get("note"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl DayStorage for DayRepository {
    async fn put(&self, record: &DayRecord) -> Result<()> {
        let expenses_json = serde_json::to_string(&record.expenses)?;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO days
                (date, revenue, tip1, tip2, expenses, expenses_total, gross, net, note, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.date)
        .bind(record.revenue)
        .bind(record.tip1)
        .bind(record.tip2)
        .bind(expenses_json)
        .bind(record.expenses_total)
        .bind(record.gross)
        .bind(record.net)
        .bind(&record.note)
        .bind(record.updated_at)
        .execute(self.db.pool())
        .await?;

        debug!("Stored day {}", record.date);
        Ok(())
    }

    async fn get(&self, date: &str) -> Result<Option<DayRecord>> {
        let row = sqlx::query(
            r#"
            SELECT date, revenue, tip1, tip2, expenses, expenses_total, gross, net, note, updated_at
            FROM days
            WHERE date = ?
            "#,
        )
        .bind(date)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_day).transpose()
    }

    async fn get_all(&self) -> Result<Vec<DayRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT date, revenue, tip1, tip2, expenses, expenses_total, gross, net, note, updated_at
            FROM days
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_day).collect()
    }

    async fn delete(&self, date: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM days WHERE date = ?")
            .bind(date)
            .execute(self.db.pool())
            .await?;

        debug!("Deleted day {} ({} rows)", date, result.rows_affected());
        Ok(())
    }
}
