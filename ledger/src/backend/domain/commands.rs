//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod days {
    use crate::backend::domain::models::day::DayRecord;
    use crate::backend::domain::models::draft::DayDraft;

    /// Query parameters for listing days.
    #[derive(Debug, Clone, Default)]
    pub struct DayListQuery {
        /// Case-insensitive substring matched against date and note
        pub filter: Option<String>,
    }

    /// Result of listing days, newest date first.
    #[derive(Debug, Clone)]
    pub struct DayListResult {
        pub days: Vec<DayRecord>,
    }

    /// Input for saving a day from its form state.
    #[derive(Debug, Clone)]
    pub struct SaveDayCommand {
        pub draft: DayDraft,
    }

    #[derive(Debug, Clone)]
    pub struct SaveDayResult {
        pub day: DayRecord,
        pub created: bool,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteDayResult {
        pub date: String,
        pub existed: bool,
        pub success_message: String,
    }
}

pub mod summary {
    use chrono::NaiveDate;

    /// Reporting window, always ending at the query's `until` date.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum SummaryPeriod {
        #[default]
        Week,
        Month,
        Year,
        All,
    }

    #[derive(Debug, Clone, Default)]
    pub struct SummaryQuery {
        pub period: SummaryPeriod,
        /// Inclusive end of the range; today when absent
        pub until: Option<NaiveDate>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct SummaryResult {
        pub period: SummaryPeriod,
        /// None for `All`
        pub start: Option<NaiveDate>,
        pub until: NaiveDate,
        pub count: usize,
        pub revenue: f64,
        pub tip1: f64,
        pub tip2: f64,
        pub expenses_total: f64,
        pub gross: f64,
        pub net: f64,
    }
}

pub mod export {
    /// A rendered export ready to be written or served.
    #[derive(Debug, Clone)]
    pub struct ExportResult {
        pub file_name: String,
        pub content_type: &'static str,
        pub content: String,
        pub record_count: usize,
    }
}
