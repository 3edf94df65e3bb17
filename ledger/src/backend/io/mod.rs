//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services.
//!
//! Handlers translate `shared` DTOs into domain commands, call the services
//! held in [`AppState`](crate::backend::AppState), and map results and errors
//! back to JSON responses with proper status codes.
//!
//! ## Supported Operations
//!
//! - **/api/days**: list, read, save, delete days and load drafts
//! - **/api/sync**: backup state, settings, sign-in, sync and restore
//! - **/api/summary**: totals for a week, month, year or everything
//! - **/api/export**: JSON and CSV downloads

pub mod rest;

pub use rest::api_router;
