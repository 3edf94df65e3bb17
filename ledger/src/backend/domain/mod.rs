//! # Domain Module
//!
//! Contains the business logic of the ledger, independent of HTTP and of the
//! storage engine.
//!
//! ## Module Organization
//!
//! - **day_service**: saving drafts, listing and deleting days
//! - **merge**: last-write-wins reconciliation of two day sets
//! - **sync_service**: backup cycle, debounced trigger, sign-in state
//! - **summary_service**: totals per week, month, year or overall
//! - **export_service**: JSON and CSV exports
//! - **commands**: internal command/result types used by the services
//! - **models**: day records, drafts and sync types
//!
//! ## Business Rules
//!
//! - One record per calendar date; saving a date replaces the whole record
//! - `expenses_total`, `gross` and `net` are recomputed on every write
//! - A record's `updated_at` never decreases for writes from this client
//! - On conflicts the newer record wins, and the local copy wins ties

pub mod commands;
pub mod day_service;
pub mod export_service;
pub mod merge;
pub mod models;
pub mod summary_service;
pub mod sync_service;

pub use day_service::{DayError, DayService};
pub use export_service::ExportService;
pub use merge::merge;
pub use summary_service::SummaryService;
pub use sync_service::SyncService;
