//! Domain models used inside the backend. The REST layer maps these to the
//! DTOs in the `shared` crate.

pub mod day;
pub mod draft;
pub mod sync;
