//! In-memory day store, used for tests and throwaway sessions.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::domain::models::day::DayRecord;
use crate::backend::storage::traits::DayStorage;

#[derive(Clone, Default)]
pub struct InMemoryDayRepository {
    days: Arc<RwLock<HashMap<String, DayRecord>>>,
}

impl InMemoryDayRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.days.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.days.read().await.is_empty()
    }
}

#[async_trait]
impl DayStorage for InMemoryDayRepository {
    async fn put(&self, record: &DayRecord) -> Result<()> {
        self.days.write().await.insert(record.date.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, date: &str) -> Result<Option<DayRecord>> {
        Ok(self.days.read().await.get(date).cloned())
    }

    async fn get_all(&self) -> Result<Vec<DayRecord>> {
        Ok(self.days.read().await.values().cloned().collect())
    }

    async fn delete(&self, date: &str) -> Result<()> {
        self.days.write().await.remove(date);
        Ok(())
    }
}
