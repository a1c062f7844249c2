use std::collections::BTreeMap;

use crate::error::{BookingError, StorageError};
use crate::schedule::slot_utils::is_canonical;
use crate::schedule::{booked_status, default_day_schedule, DaySchedule, Slot, OPEN_STATUS};

use super::persistence::KeyValueStore;

/// Storage key the availability snapshot lives under
pub const AVAILABILITY_KEY: &str = "availability";

/// Highest day key the mapping accepts
pub const MAX_DAY: u32 = 31;

/// Day of month -> that day's slots.
///
/// Day numbers are not qualified by month or year: day 5 of March and day 5
/// of April share an entry.
pub type Availability = BTreeMap<u32, DaySchedule>;

/// Serializes the mapping as `{ "day": [{ time, status }, ...] }`.
pub fn encode_availability(availability: &Availability) -> Result<String, serde_json::Error> {
    serde_json::to_string(availability)
}

/// Parses a stored snapshot. Anything malformed yields an empty mapping.
pub fn decode_availability(raw: &str) -> Availability {
    let availability: Availability = match serde_json::from_str(raw) {
        Ok(availability) => availability,
        Err(e) => {
            tracing::warn!(error = %e, "stored availability is malformed, starting empty");
            return Availability::new();
        }
    };

    let valid = availability
        .iter()
        .all(|(day, schedule)| (1..=MAX_DAY).contains(day) && is_canonical(schedule));
    if !valid {
        tracing::warn!("stored availability does not match the slot catalog, starting empty");
        return Availability::new();
    }

    availability
}

/// In-memory availability with an injected persistence backend.
pub struct AvailabilityStore<S> {
    days: Availability,
    backend: S,
    persists: bool,
}

impl<S: KeyValueStore> AvailabilityStore<S> {
    /// Empty store that never reads or writes the backend.
    pub fn transient(backend: S) -> Self {
        AvailabilityStore {
            days: Availability::new(),
            backend,
            persists: false,
        }
    }

    /// Store seeded from the backend's snapshot, persisting after every mutation.
    pub fn load(backend: S) -> Self {
        let days = backend
            .get_item(AVAILABILITY_KEY)
            .map(|raw| decode_availability(&raw))
            .unwrap_or_default();
        tracing::debug!(days = days.len(), "loaded availability");

        AvailabilityStore {
            days,
            backend,
            persists: true,
        }
    }

    pub fn availability(&self) -> &Availability {
        &self.days
    }

    /// Returns the day's schedule, creating it from the catalog on first access.
    /// Days outside 1..=31 are refused and never enter the mapping.
    pub fn get_or_init(&mut self, day: u32) -> Result<&DaySchedule, BookingError> {
        if !(1..=MAX_DAY).contains(&day) {
            return Err(BookingError::DayOutOfRange(day));
        }
        Ok(&*self.days.entry(day).or_insert_with(default_day_schedule))
    }

    pub fn find_slot(&self, day: u32, time: &str) -> Option<&Slot> {
        self.days.get(&day)?.find(time)
    }

    /// Books an open slot for `name`.
    pub fn set_booked(&mut self, day: u32, time: &str, name: &str) -> Result<(), BookingError> {
        let slot = self.slot_mut(day, time)?;
        if !slot.is_open() {
            return Err(BookingError::SlotConflict(time.to_string()));
        }
        slot.status = booked_status(name);
        Ok(())
    }

    /// Reverts a booked slot to open.
    pub fn set_open(&mut self, day: u32, time: &str) -> Result<(), BookingError> {
        let slot = self.slot_mut(day, time)?;
        if !slot.is_booked() {
            return Err(BookingError::NotBooked(time.to_string()));
        }
        slot.status = OPEN_STATUS.to_string();
        Ok(())
    }

    /// Snapshot currently held by the backend under the availability key.
    pub fn stored_snapshot(&self) -> Option<String> {
        self.backend.get_item(AVAILABILITY_KEY)
    }

    /// Writes the whole mapping to the backend. A no-op for transient stores.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        if !self.persists {
            return Ok(());
        }
        let snapshot = encode_availability(&self.days)?;
        self.backend.set_item(AVAILABILITY_KEY, snapshot)
    }

    fn slot_mut(&mut self, day: u32, time: &str) -> Result<&mut Slot, BookingError> {
        self.days
            .get_mut(&day)
            .and_then(|schedule| schedule.find_mut(time))
            .ok_or_else(|| BookingError::SlotNotFound(time.to_string()))
    }
}
