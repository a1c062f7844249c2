use super::types::{DaySchedule, Slot};

/// Hour the first slot of the day starts at
pub const FIRST_HOUR: u32 = 6;

/// Number of hourly slots per day (06:00 to 22:00)
pub const SLOT_COUNT: usize = 16;

/// Formats the label for the slot starting at `hour`, e.g. "9:00 - 10:00"
pub fn slot_label(hour: u32) -> String {
    format!("{}:00 - {}:00", hour, hour + 1)
}

/// Labels of the canonical catalog, in order
pub fn slot_labels() -> Vec<String> {
    (FIRST_HOUR..FIRST_HOUR + SLOT_COUNT as u32)
        .map(slot_label)
        .collect()
}

/// Builds a fresh copy of the canonical catalog with every slot open.
///
/// Each call returns a new schedule, so mutating one day never touches
/// another day's slots.
pub fn default_day_schedule() -> DaySchedule {
    DaySchedule::from_slots(slot_labels().into_iter().map(Slot::open).collect())
}

/// Checks that a schedule holds exactly the canonical slots in canonical order.
pub fn is_canonical(schedule: &DaySchedule) -> bool {
    schedule.len() == SLOT_COUNT
        && schedule
            .slots()
            .iter()
            .zip(slot_labels())
            .all(|(slot, label)| slot.time == label)
}
