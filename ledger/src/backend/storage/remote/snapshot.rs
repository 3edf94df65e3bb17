//! Backup file format: `{app, version, updatedAt, days: [...]}`.
//!
//! Reading is deliberately forgiving. A missing, empty or unparsable file is
//! an empty snapshot, and individual day entries that cannot be read are
//! skipped, so a first-run empty file never blocks a restore.

use anyhow::Result;
use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::backend::domain::models::day::DayRecord;

pub const SNAPSHOT_APP: &str = "TaxiLedger";
pub const SNAPSHOT_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSnapshot {
    pub app: String,
    pub version: u64,
    pub updated_at: i64,
    pub days: Vec<DayRecord>,
}

impl RemoteSnapshot {
    pub fn new(days: Vec<DayRecord>, updated_at: i64) -> Self {
        Self {
            app: SNAPSHOT_APP.to_string(),
            version: SNAPSHOT_VERSION,
            updated_at,
            days,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse file content, treating anything unreadable as empty.
    ///
    /// `exportedAt` is accepted in place of `updatedAt`.
    pub fn parse_lenient(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::empty();
        }

        let value: Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) => {
                warn!("Backup content is not valid JSON, treating as empty: {}", e);
                return Self::empty();
            }
        };

        let Some(object) = value.as_object() else {
            warn!("Backup content is not a JSON object, treating as empty");
            return Self::empty();
        };

        let updated_at = object
            .get("updatedAt")
            .or_else(|| object.get("exportedAt"))
            .and_then(Value::as_i64)
            .unwrap_or(0);

        let mut days = Vec::new();
        if let Some(entries) = object.get("days").and_then(Value::as_array) {
            for entry in entries {
                match serde_json::from_value::<DayRecord>(entry.clone()) {
                    Ok(day) if !day.date.is_empty() => days.push(day),
                    Ok(_) => warn!("Skipping backup entry without a date"),
                    Err(e) => warn!("Skipping unreadable backup entry: {}", e),
                }
            }
        }

        Self {
            app: object
                .get("app")
                .and_then(Value::as_str)
                .unwrap_or(SNAPSHOT_APP)
                .to_string(),
            version: object.get("version").and_then(Value::as_u64).unwrap_or(SNAPSHOT_VERSION),
            updated_at,
            days,
        }
    }
}
