//! Conversions between the `shared` DTOs and domain types.

pub mod day_mapper;
pub mod summary_mapper;
pub mod sync_mapper;

pub use day_mapper::DayMapper;
pub use summary_mapper::SummaryMapper;
pub use sync_mapper::SyncMapper;
