pub mod slot_utils;
pub mod types;

pub use slot_utils::{default_day_schedule, slot_labels};
pub use types::{booked_status, DaySchedule, Slot, OPEN_STATUS};
