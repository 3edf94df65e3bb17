//! Caller-owned form state for one day.
//!
//! A [`DayDraft`] holds what the user typed, before numeric coercion. It is
//! loaded from a stored record (or started empty for a date), edited by the
//! caller, and turned into a [`DayRecord`] only when saved.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::day::{DayRecord, Expense};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayDraft {
    pub date: Option<String>,
    pub revenue: String,
    pub tip1: String,
    pub tip2: String,
    pub note: String,
    pub expenses: Vec<ExpenseLine>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub id: String,
    pub label: String,
    pub amount: String,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DraftError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Coerce user input to a number: trims, accepts a decimal comma, and falls
/// back to 0 for anything unparsable or non-finite.
pub fn parse_amount(input: &str) -> f64 {
    let cleaned = input.trim().replacen(',', ".", 1);
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Parse a `YYYY-MM-DD` date, tolerating surrounding whitespace.
pub fn parse_date(input: &str) -> Result<NaiveDate, DraftError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| DraftError::InvalidDate(input.to_string()))
}

fn format_amount(n: f64) -> String {
    if n == 0.0 {
        String::new()
    } else {
        n.to_string()
    }
}

impl ExpenseLine {
    pub fn new(label: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            amount: amount.into(),
        }
    }
}

impl DayDraft {
    /// An empty draft for the given date
    pub fn for_date(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Default::default()
        }
    }

    /// Load a stored record back into editable form
    pub fn from_record(record: &DayRecord) -> Self {
        Self {
            date: Some(record.date.clone()),
            revenue: format_amount(record.revenue),
            tip1: format_amount(record.tip1),
            tip2: format_amount(record.tip2),
            note: record.note.clone(),
            expenses: record
                .expenses
                .iter()
                .map(|e| ExpenseLine {
                    id: e.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string()),
                    label: e.label.clone(),
                    amount: e.amount.to_string(),
                })
                .collect(),
        }
    }

    /// New expense lines go to the top of the list, like the entry form.
    pub fn add_expense(&mut self, label: impl Into<String>, amount: impl Into<String>) -> String {
        let line = ExpenseLine::new(label, amount);
        let id = line.id.clone();
        self.expenses.insert(0, line);
        id
    }

    /// Returns false when no line has that id
    pub fn remove_expense(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        self.expenses.len() != before
    }

    /// Running totals as shown while editing: (expenses_total, gross, net)
    pub fn live_totals(&self) -> (f64, f64, f64) {
        let record = self.build_record(String::new(), 0);
        (record.expenses_total, record.gross, record.net)
    }

    /// Turn the draft into a record with derived totals.
    ///
    /// `today` is used when the draft carries no date. Blank expense lines
    /// (empty label and zero amount) are dropped.
    pub fn to_record(&self, today: NaiveDate, updated_at: i64) -> Result<DayRecord, DraftError> {
        let date = match self.date.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => parse_date(d)?,
            _ => today,
        };
        Ok(self.build_record(date.format(DATE_FORMAT).to_string(), updated_at))
    }

    fn build_record(&self, date: String, updated_at: i64) -> DayRecord {
        let expenses = self
            .expenses
            .iter()
            .map(|e| Expense {
                id: Some(e.id.clone()),
                label: e.label.trim().to_string(),
                amount: parse_amount(&e.amount),
            })
            .filter(|e| !e.label.is_empty() || e.amount != 0.0)
            .collect();

        DayRecord::new(
            date,
            parse_amount(&self.revenue),
            parse_amount(&self.tip1),
            parse_amount(&self.tip2),
            expenses,
            self.note.trim(),
            updated_at,
        )
    }
}
