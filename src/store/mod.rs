pub mod availability;
pub mod persistence;

pub use availability::{Availability, AvailabilityStore};
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
