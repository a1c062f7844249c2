use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Weekday alignment of one month. `month` is zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    /// Weekday of the 1st, 0 = Sunday .. 6 = Saturday
    pub first_weekday: u32,
    pub days_in_month: u32,
}

impl MonthLayout {
    /// Number of blank cells before day 1 in a Monday-first week.
    pub fn offset(&self) -> u32 {
        (self.first_weekday + 6) % 7
    }
}

/// Normalizes a zero-based month that may lie outside 0..=11 into the
/// adjacent year, e.g. (2024, 12) becomes (2025, 0) and (2024, -1) becomes (2023, 11).
pub fn normalize_month(year: i32, month: i32) -> Option<(i32, u32)> {
    let year = year.checked_add(month.div_euclid(12))?;
    Some((year, month.rem_euclid(12) as u32))
}

/// First calendar day of a (possibly overflowing) zero-based month.
pub fn first_of_month(year: i32, month: i32) -> Option<NaiveDate> {
    let (year, month) = normalize_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month + 1, 1)
}

/// Computes the grid layout for a month. Returns `None` only for years chrono
/// cannot represent.
pub fn month_layout(year: i32, month: i32) -> Option<MonthLayout> {
    let first = first_of_month(year, month)?;
    // Day 0 of the next month is the last day of this one
    let last = first_of_month(year, month.checked_add(1)?)?.pred_opt()?;

    Some(MonthLayout {
        year: first.year(),
        month: first.month0(),
        first_weekday: first.weekday().num_days_from_sunday(),
        days_in_month: last.day(),
    })
}

/// Parses the start hour out of a slot label such as "9:00 - 10:00".
pub fn parse_start_hour(time_label: &str) -> Option<u32> {
    time_label.split(':').next()?.trim().parse().ok()
}

/// Local start time of a slot on the given day. Out-of-range days roll into
/// the neighbouring month the same way months roll into neighbouring years.
pub fn slot_start_time(
    year: i32,
    month: i32,
    day: u32,
    time_label: &str,
) -> Option<NaiveDateTime> {
    let hour = parse_start_hour(time_label)?;
    let date = first_of_month(year, month)?
        .checked_add_signed(Duration::days(i64::from(day) - 1))?;
    date.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::hours(i64::from(hour)))
}
