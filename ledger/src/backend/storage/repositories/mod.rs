// Repository modules
pub mod day_repository;
pub mod memory_day_repository;
pub mod sync_settings_repository;

// Re-export repository types
pub use day_repository::DayRepository;
pub use memory_day_repository::InMemoryDayRepository;
pub use sync_settings_repository::SyncSettingsRepository;
