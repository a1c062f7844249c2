use std::fmt::Write;

use crate::view::{CalendarView, ScheduleView};

const WEEKDAY_HEADER: &str = "Mo Tu We Th Fr Sa Su";

/// Formats a month grid as text, weeks starting on Monday
pub fn format_calendar<A>(calendar: &CalendarView<A>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^20}", calendar.title);
    let _ = writeln!(out, "{}", WEEKDAY_HEADER);

    let blanks = std::iter::repeat("  ".to_string()).take(calendar.blanks as usize);
    let days = calendar.days.iter().map(|cell| {
        if cell.selected {
            format!("{:>2}", format!("*{}", cell.day))
        } else {
            format!("{:>2}", cell.day)
        }
    });
    let cells: Vec<String> = blanks.chain(days).collect();

    for week in cells.chunks(7) {
        let _ = writeln!(out, "{}", week.join(" ").trim_end());
    }
    out
}

/// Formats a day's slot list as text
pub fn format_schedule(schedule: &ScheduleView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", schedule.header);
    for row in &schedule.rows {
        let marker = if row.booked { "x" } else { " " };
        let cancel = if row.cancellable { "  [cancellable]" } else { "" };
        let _ = writeln!(out, "  [{}] {}{}", marker, row.text, cancel);
    }
    out
}

pub fn print_calendar<A>(calendar: &CalendarView<A>) {
    print!("{}", format_calendar(calendar));
}

pub fn print_schedule(schedule: &ScheduleView) {
    print!("{}", format_schedule(schedule));
}
