use chrono::Month;
use serde::Serialize;

use crate::calendar::month_layout;

/// Rendered month grid. `A` is whatever a click on a day cell should trigger.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarView<A> {
    pub year: i32,
    /// Zero-based month
    pub month: u32,
    pub title: String,
    /// Blank placeholder cells before day 1
    pub blanks: u32,
    pub days: Vec<DayCell<A>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell<A> {
    pub day: u32,
    pub selected: bool,
    pub on_click: A,
}

/// Month name for a zero-based month index.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month + 1)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

/// Builds the full grid for a month from scratch; each day cell gets the
/// action produced by `on_click` for its day number.
pub fn render_calendar<A, F>(
    year: i32,
    month: i32,
    selected_day: Option<u32>,
    on_click: F,
) -> Option<CalendarView<A>>
where
    F: Fn(u32) -> A,
{
    let layout = month_layout(year, month)?;

    let days = (1..=layout.days_in_month)
        .map(|day| DayCell {
            day,
            selected: selected_day == Some(day),
            on_click: on_click(day),
        })
        .collect();

    Some(CalendarView {
        year: layout.year,
        month: layout.month,
        title: format!("{} {}", month_name(layout.month), layout.year),
        blanks: layout.offset(),
        days,
    })
}
