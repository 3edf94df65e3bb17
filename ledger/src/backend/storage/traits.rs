//! # Storage Traits
//!
//! Storage abstractions that let the domain layer work with any day store
//! (SQLite on disk, in-memory for tests) without knowing the implementation.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::backend::domain::models::day::DayRecord;

/// Durable collection of day records keyed by `date`.
///
/// The store performs no validation and no retries; engine failures surface
/// as errors to the caller.
#[async_trait]
pub trait DayStorage: Send + Sync {
    /// Insert or fully replace the record at `record.date`
    async fn put(&self, record: &DayRecord) -> Result<()>;

    /// Point lookup. Absence is `Ok(None)`, never an error
    async fn get(&self, date: &str) -> Result<Option<DayRecord>>;

    /// Full scan in storage order; callers sort
    async fn get_all(&self) -> Result<Vec<DayRecord>>;

    /// Remove the record for `date`. Deleting a missing date is a no-op
    async fn delete(&self, date: &str) -> Result<()>;

    /// Apply incoming records with last-write-wins against what is stored.
    ///
    /// An incoming record replaces the local one only when it is strictly
    /// newer; equal timestamps keep the local copy. Records are written one by
    /// one, so a failure part way leaves earlier writes in place.
    /// Returns the number of records written.
    async fn merge_many(&self, records: &[DayRecord]) -> Result<usize> {
        let mut written = 0;
        for incoming in records {
            let replace = match self.get(&incoming.date).await? {
                Some(existing) => incoming.updated_at > existing.updated_at,
                None => true,
            };
            if replace {
                self.put(&incoming.clone().with_recomputed_totals()).await?;
                written += 1;
            }
        }
        debug!("merge_many wrote {} of {} records", written, records.len());
        Ok(written)
    }
}
