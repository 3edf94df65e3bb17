//! Last-write-wins reconciliation of two day sets.

use std::collections::HashMap;

use crate::backend::domain::models::day::DayRecord;

/// Merge local records with a remote snapshot.
///
/// Remote records are inserted first; a local record then replaces the entry
/// when there is none or when `local.updated_at >= existing.updated_at`, so
/// local wins ties. Every date present in either input appears exactly once
/// in the output. Records are taken whole; fields are never mixed.
///
/// Output order is unspecified.
pub fn merge(local: &[DayRecord], remote: &[DayRecord]) -> Vec<DayRecord> {
    let mut by_date: HashMap<&str, &DayRecord> = HashMap::with_capacity(local.len() + remote.len());

    for record in remote {
        match by_date.get(record.date.as_str()) {
            // Duplicate dates inside one snapshot: keep the newest
            Some(existing) if existing.updated_at >= record.updated_at => {}
            _ => {
                by_date.insert(record.date.as_str(), record);
            }
        }
    }

    for record in local {
        match by_date.get(record.date.as_str()) {
            Some(existing) if record.updated_at < existing.updated_at => {}
            _ => {
                by_date.insert(record.date.as_str(), record);
            }
        }
    }

    by_date.into_values().cloned().collect()
}
