//! Domain model for a ledger day.
//!
//! The serde shape of [`DayRecord`] is the backup-file shape: camelCase keys,
//! lenient defaults for anything missing. Derived totals are only ever
//! produced by [`DayRecord::recompute_totals`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub date: String, // YYYY-MM-DD, primary key
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub tip1: f64,
    #[serde(default)]
    pub tip2: f64,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub expenses_total: f64,
    #[serde(default)]
    pub gross: f64,
    #[serde(default)]
    pub net: f64,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub updated_at: i64, // epoch millis
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub amount: f64,
}

impl Expense {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            id: None,
            label: label.into(),
            amount,
        }
    }
}

impl DayRecord {
    /// Build a record with its derived totals filled in.
    pub fn new(
        date: impl Into<String>,
        revenue: f64,
        tip1: f64,
        tip2: f64,
        expenses: Vec<Expense>,
        note: impl Into<String>,
        updated_at: i64,
    ) -> Self {
        let mut record = Self {
            date: date.into(),
            revenue,
            tip1,
            tip2,
            expenses,
            expenses_total: 0.0,
            gross: 0.0,
            net: 0.0,
            note: note.into(),
            updated_at,
        };
        record.recompute_totals();
        record
    }

    /// Recalculate `expenses_total`, `gross` and `net` from the other fields.
    pub fn recompute_totals(&mut self) {
        self.expenses_total = self.expenses.iter().fold(0.0, |acc, e| acc + e.amount);
        self.gross = self.revenue + self.tip1 + self.tip2;
        self.net = self.gross - self.expenses_total;
    }

    /// Consuming variant of [`recompute_totals`](Self::recompute_totals).
    pub fn with_recomputed_totals(mut self) -> Self {
        self.recompute_totals();
        self
    }

    pub fn has_consistent_totals(&self) -> bool {
        let expected = self.clone().with_recomputed_totals();
        expected.expenses_total == self.expenses_total
            && expected.gross == self.gross
            && expected.net == self.net
    }

    /// Case-insensitive substring match on the date or the note.
    pub fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.date.to_lowercase().contains(&needle) || self.note.to_lowercase().contains(&needle)
    }
}

/// Sort newest date first. `YYYY-MM-DD` sorts chronologically as text.
pub fn sort_newest_first(days: &mut [DayRecord]) {
    days.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_totals() {
        let day = DayRecord::new(
            "2024-01-01",
            100.0,
            10.0,
            5.0,
            vec![Expense::new("a", 20.0), Expense::new("b", 5.0)],
            "",
            1,
        );

        assert_eq!(day.expenses_total, 25.0);
        assert_eq!(day.gross, 115.0);
        assert_eq!(day.net, 90.0);
        assert!(day.has_consistent_totals());
    }

    #[test]
    fn test_stale_totals_detected_and_fixed() {
        let mut day = DayRecord::new("2024-01-01", 100.0, 0.0, 0.0, vec![], "", 1);
        day.net = 999.0;
        assert!(!day.has_consistent_totals());

        let fixed = day.with_recomputed_totals();
        assert_eq!(fixed.net, 100.0);
    }

    #[test]
    fn test_lenient_deserialize() {
        let day: DayRecord = serde_json::from_str(r#"{"date":"2024-01-02","revenue":50}"#).unwrap();
        assert_eq!(day.revenue, 50.0);
        assert!(day.expenses.is_empty());
        assert_eq!(day.updated_at, 0);
        assert_eq!(day.note, "");
    }

    #[test]
    fn test_matches_filter() {
        let day = DayRecord::new("2024-05-10", 0.0, 0.0, 0.0, vec![], "Airport run", 1);
        assert!(day.matches_filter("airport"));
        assert!(day.matches_filter("2024-05"));
        assert!(day.matches_filter("  "));
        assert!(!day.matches_filter("station"));
    }

    #[test]
    fn test_sort_newest_first() {
        let mut days = vec![
            DayRecord::new("2024-01-02", 0.0, 0.0, 0.0, vec![], "", 1),
            DayRecord::new("2024-03-01", 0.0, 0.0, 0.0, vec![], "", 1),
            DayRecord::new("2023-12-31", 0.0, 0.0, 0.0, vec![], "", 1),
        ];
        sort_newest_first(&mut days);
        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-01-02", "2023-12-31"]);
    }
}
