pub mod calendar;
pub mod schedule;

pub use calendar::{month_name, render_calendar, CalendarView};
pub use schedule::{can_cancel, render_schedule, ScheduleView};
