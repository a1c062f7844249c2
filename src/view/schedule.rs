use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::calendar::{normalize_month, slot_start_time};
use crate::config::BookingFeatures;
use crate::schedule::{slot_labels, DaySchedule, Slot};

/// Hours before a slot's start after which a booking can no longer be cancelled
pub const CANCELLATION_WINDOW_HOURS: i64 = 2;

/// Rendered slot list for the selected day.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub year: i32,
    /// Zero-based month
    pub month: i32,
    pub day: u32,
    pub header: String,
    pub rows: Vec<SlotRow>,
    /// Every canonical time label for the form's slot selector
    pub time_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotRow {
    pub time: String,
    pub status: String,
    pub text: String,
    pub booked: bool,
    /// Clicking the row puts its time into the booking form
    pub selectable: bool,
    /// A cancel control is attached to the row
    pub cancellable: bool,
}

/// Whether a booking starting at `start` may still be cancelled at `now`.
pub fn within_cancellation_window(start: NaiveDateTime, now: NaiveDateTime) -> bool {
    start - now > Duration::hours(CANCELLATION_WINDOW_HOURS)
}

/// Whether the booked slot on the given day can be cancelled at `now`.
pub fn can_cancel(year: i32, month: i32, day: u32, slot: &Slot, now: NaiveDateTime) -> bool {
    slot.is_booked()
        && slot_start_time(year, month, day, &slot.time)
            .map(|start| within_cancellation_window(start, now))
            .unwrap_or(false)
}

fn schedule_header(year: i32, month: i32, day: u32) -> String {
    match normalize_month(year, month) {
        Some((year, month)) => format!("Bookings for {}-{:02}-{:02}", year, month + 1, day),
        None => format!("Bookings for day {}", day),
    }
}

pub fn render_schedule(
    year: i32,
    month: i32,
    day: u32,
    schedule: &DaySchedule,
    features: BookingFeatures,
    now: NaiveDateTime,
) -> ScheduleView {
    let rows = schedule
        .slots()
        .iter()
        .map(|slot| {
            let booked = slot.is_booked();
            SlotRow {
                time: slot.time.clone(),
                status: slot.status.clone(),
                text: format!("{} - {}", slot.time, slot.status),
                booked,
                // Without cancellation every row stays selectable
                selectable: !booked || !features.supports_cancellation,
                cancellable: features.supports_cancellation
                    && can_cancel(year, month, day, slot, now),
            }
        })
        .collect();

    ScheduleView {
        year,
        month,
        day,
        header: schedule_header(year, month, day),
        rows,
        time_options: slot_labels(),
    }
}
