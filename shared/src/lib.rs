use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ledger day as exchanged with the UI.
///
/// Field names follow the JSON shape of the backup file (`expensesTotal`,
/// `updatedAt`, ...), so the same payload can be pasted between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// Calendar date in `YYYY-MM-DD` format, unique per record
    pub date: String,
    pub revenue: f64,
    pub tip1: f64,
    pub tip2: f64,
    pub expenses: Vec<Expense>,
    /// Sum of all expense amounts
    pub expenses_total: f64,
    /// revenue + tip1 + tip2
    pub gross: f64,
    /// gross - expenses_total
    pub net: f64,
    pub note: String,
    /// Epoch millis of the last local modification
    pub updated_at: i64,
}

/// One itemized cost line of a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub amount: f64,
}

/// A numeric form value that may arrive either as a JSON number or as the raw
/// text the user typed (e.g. `"12,50"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl Default for AmountInput {
    fn default() -> Self {
        AmountInput::Number(0.0)
    }
}

impl fmt::Display for AmountInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountInput::Number(n) => write!(f, "{}", n),
            AmountInput::Text(s) => write!(f, "{}", s),
        }
    }
}

/// An expense line of a draft, before coercion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub amount: AmountInput,
}

/// The editable form state of one day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDraft {
    /// `YYYY-MM-DD`; today is used when missing
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub revenue: AmountInput,
    #[serde(default)]
    pub tip1: AmountInput,
    #[serde(default)]
    pub tip2: AmountInput,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub expenses: Vec<ExpenseInput>,
}

/// Query for the day history list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayListRequest {
    /// Case-insensitive substring matched against the date and the note
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayListResponse {
    /// Newest date first
    pub days: Vec<DayRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDayResponse {
    pub day: DayRecord,
    pub created: bool,
    pub success_message: String,
}

/// Snapshot of the sync driver as shown in the settings screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStateResponse {
    pub enabled: bool,
    pub signed_in: bool,
    pub online: bool,
    pub syncing: bool,
    pub last_sync_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyncNowRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSyncRequest {
    #[serde(default)]
    pub delay_ms: Option<u64>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSyncEnabledRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    pub force_prompt: bool,
}

/// Hands over a bearer token obtained by an external authorization flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTokenRequest {
    pub access_token: String,
    /// Lifetime in seconds, defaults to one hour
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOnlineRequest {
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReportResponse {
    pub reason: String,
    pub local_count: usize,
    pub remote_count: usize,
    pub merged_count: usize,
    /// Dates where the remote copy replaced the local one
    pub pulled_count: usize,
    pub last_sync_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreResponse {
    pub remote_count: usize,
    pub merged_count: usize,
    pub last_sync_at: i64,
}

/// Aggregation window for the summary screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    #[default]
    Week,
    Month,
    Year,
    All,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub period: SummaryPeriod,
    /// Inclusive end date (`YYYY-MM-DD`), today when missing
    #[serde(default)]
    pub until: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub period: SummaryPeriod,
    /// First day of the range, absent for `all`
    pub start: Option<String>,
    pub until: String,
    pub count: usize,
    pub revenue: f64,
    pub tip1: f64,
    pub tip2: f64,
    pub expenses_total: f64,
    pub gross: f64,
    pub net: f64,
}

/// Error body returned by the REST layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
