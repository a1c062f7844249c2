use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calendar::{month_layout, normalize_month};
use crate::config::BookingFeatures;
use crate::error::BookingError;
use crate::store::{AvailabilityStore, KeyValueStore};
use crate::view::{can_cancel, render_calendar, render_schedule, CalendarView, ScheduleView};

use super::form::PageState;

/// Blocking message shown to the user after an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Success { message: String },
    Failure { message: String },
    /// Asks the user to confirm cancelling a booking
    ConfirmCancel { day: u32, time: String, message: String },
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success { message }
            | Notification::Failure { message }
            | Notification::ConfirmCancel { message, .. } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success { .. })
    }
}

impl From<BookingError> for Notification {
    fn from(error: BookingError) -> Self {
        Notification::Failure {
            message: error.to_string(),
        }
    }
}

/// Top-level controller owning the availability store. Every method handles
/// one UI event against the page state it is given.
pub struct BookingApp<S> {
    store: AvailabilityStore<S>,
    features: BookingFeatures,
}

impl<S: KeyValueStore> BookingApp<S> {
    pub fn new(backend: S, features: BookingFeatures) -> Self {
        let store = if features.persists {
            AvailabilityStore::load(backend)
        } else {
            AvailabilityStore::transient(backend)
        };
        BookingApp { store, features }
    }

    pub fn store(&self) -> &AvailabilityStore<S> {
        &self.store
    }

    /// Year or month selector changed. Month overflow rolls into the year;
    /// a month the calendar cannot lay out leaves the page untouched.
    pub fn change_month(
        &self,
        page: &mut PageState,
        year: i32,
        month: i32,
    ) -> Result<(), BookingError> {
        let (year, month) = normalize_month(year, month).ok_or(BookingError::MonthOutOfRange)?;
        let month = month as i32;
        month_layout(year, month).ok_or(BookingError::MonthOutOfRange)?;
        page.year = year;
        page.month = month;
        Ok(())
    }

    /// Builds the calendar for the page's selected year and month.
    pub fn calendar<A, F>(&self, page: &PageState, on_click: F) -> Option<CalendarView<A>>
    where
        F: Fn(u32) -> A,
    {
        render_calendar(page.year, page.month, page.selected_day, on_click)
    }

    /// Day cell clicked: selects the day and renders its slots. Only days the
    /// displayed month actually has are accepted.
    pub fn show_schedule(
        &mut self,
        page: &mut PageState,
        day: u32,
        now: NaiveDateTime,
    ) -> Result<ScheduleView, BookingError> {
        let layout = month_layout(page.year, page.month).ok_or(BookingError::MonthOutOfRange)?;
        if !(1..=layout.days_in_month).contains(&day) {
            return Err(BookingError::DayOutOfRange(day));
        }
        let view = self.render_day(page, day, now)?;
        page.selected_day = Some(day);
        Ok(view)
    }

    /// Re-renders the selected day, if there is one.
    pub fn current_schedule(
        &mut self,
        page: &PageState,
        now: NaiveDateTime,
    ) -> Option<ScheduleView> {
        let day = page.selected_day?;
        self.render_day(page, day, now).ok()
    }

    /// Open slot clicked: moves the form's slot selector to it.
    pub fn select_time_slot(&self, page: &mut PageState, time: &str) {
        page.form.time_slot = time.to_string();
    }

    /// Booking form submitted with the page's current form values.
    pub fn submit_booking(&mut self, page: &mut PageState) -> Notification {
        let Some(day) = page.selected_day else {
            return BookingError::NoDaySelected.into();
        };

        let name = std::mem::take(&mut page.form.name);
        let time = page.form.time_slot.clone();
        page.form.reset();

        match self.store.set_booked(day, &time, &name) {
            Ok(()) => {
                tracing::info!(day, time = %time, booker = %name, "slot booked");
                self.save();
                Notification::Success {
                    message: format!("{}, your booking for {} is confirmed", name, time),
                }
            }
            Err(e) => {
                tracing::info!(day, time = %time, error = %e, "booking refused");
                e.into()
            }
        }
    }

    /// Cancel control clicked: checks the booking can be cancelled and
    /// returns the confirmation prompt.
    pub fn request_cancellation(
        &self,
        page: &PageState,
        day: u32,
        time: &str,
        now: NaiveDateTime,
    ) -> Result<Notification, BookingError> {
        self.check_cancellable(page, day, time, now)?;
        Ok(Notification::ConfirmCancel {
            day,
            time: time.to_string(),
            message: format!("Are you sure you want to cancel the booking for {}?", time),
        })
    }

    /// Resumes a cancellation once the user answered the prompt. Returns
    /// whether the booking was cancelled.
    pub fn cancel_booking(
        &mut self,
        page: &mut PageState,
        day: u32,
        time: &str,
        confirmed: bool,
        now: NaiveDateTime,
    ) -> Result<bool, BookingError> {
        if !confirmed {
            return Ok(false);
        }
        self.check_cancellable(page, day, time, now)?;
        self.store.set_open(day, time)?;
        tracing::info!(day, time = %time, "booking cancelled");
        self.save();

        page.selected_day = Some(day);
        Ok(true)
    }

    fn check_cancellable(
        &self,
        page: &PageState,
        day: u32,
        time: &str,
        now: NaiveDateTime,
    ) -> Result<(), BookingError> {
        if !self.features.supports_cancellation {
            return Err(BookingError::CancellationDisabled);
        }
        let slot = self
            .store
            .find_slot(day, time)
            .ok_or_else(|| BookingError::SlotNotFound(time.to_string()))?;
        if !slot.is_booked() {
            return Err(BookingError::NotBooked(time.to_string()));
        }
        if !can_cancel(page.year, page.month, day, slot, now) {
            return Err(BookingError::CancellationWindowClosed(time.to_string()));
        }
        Ok(())
    }

    fn render_day(
        &mut self,
        page: &PageState,
        day: u32,
        now: NaiveDateTime,
    ) -> Result<ScheduleView, BookingError> {
        let features = self.features;
        let schedule = self.store.get_or_init(day)?;
        Ok(render_schedule(page.year, page.month, day, schedule, features, now))
    }

    // The in-memory change stands even when the write fails
    fn save(&mut self) {
        if let Err(e) = self.store.persist() {
            tracing::error!(error = %e, "failed to persist availability");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::availability::AVAILABILITY_KEY;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn app() -> BookingApp<MemoryStore> {
        BookingApp::new(MemoryStore::new(), BookingFeatures::default())
    }

    fn book(
        app: &mut BookingApp<MemoryStore>,
        page: &mut PageState,
        time: &str,
        name: &str,
    ) -> Notification {
        app.select_time_slot(page, time);
        page.form.name = name.to_string();
        app.submit_booking(page)
    }

    #[test]
    fn submit_without_a_day_is_refused() {
        let mut app = app();
        let mut page = PageState::new(2024, 2);
        page.form.name = "Alice".to_string();
        page.form.time_slot = "6:00 - 7:00".to_string();

        let notice = app.submit_booking(&mut page);
        assert_eq!(notice, Notification::from(BookingError::NoDaySelected));
        assert!(app.store().availability().is_empty());
        assert_eq!(page.form.name, "Alice");
    }

    #[test]
    fn second_booking_of_a_slot_conflicts() {
        let mut app = app();
        let mut page = PageState::new(2024, 2);
        app.show_schedule(&mut page, 10, at(2024, 3, 1, 8)).unwrap();

        let notice = book(&mut app, &mut page, "6:00 - 7:00", "Alice");
        assert!(notice.is_success());
        assert!(notice.message().contains("Alice"));
        assert!(notice.message().contains("6:00 - 7:00"));

        let notice = book(&mut app, &mut page, "6:00 - 7:00", "Bob");
        assert!(!notice.is_success());
        assert_eq!(
            app.store().find_slot(10, "6:00 - 7:00").unwrap().booker(),
            Some("Alice")
        );

        let view = app.current_schedule(&page, at(2024, 3, 1, 8)).unwrap();
        assert_eq!(view.rows[0].text, "6:00 - 7:00 - Booked by Alice");
    }

    #[test]
    fn form_resets_after_every_submission() {
        let mut app = app();
        let mut page = PageState::new(2024, 2);
        app.show_schedule(&mut page, 10, at(2024, 3, 1, 8)).unwrap();

        book(&mut app, &mut page, "9:00 - 10:00", "Alice");
        assert_eq!(page.form.name, "");
        assert_eq!(page.form.time_slot, "6:00 - 7:00");

        book(&mut app, &mut page, "9:00 - 10:00", "Bob");
        assert_eq!(page.form.name, "");
        assert_eq!(page.selected_day, Some(10));
    }

    #[test]
    fn bookings_are_persisted() {
        let mut app = app();
        let mut page = PageState::new(2024, 2);
        app.show_schedule(&mut page, 3, at(2024, 3, 1, 8)).unwrap();
        book(&mut app, &mut page, "7:00 - 8:00", "Alice");

        let raw = app.store().stored_snapshot();
        assert!(raw.unwrap().contains("Booked by Alice"));
    }

    #[test]
    fn day_keys_collide_across_months() {
        let mut app = app();
        let mut page = PageState::new(2024, 2);
        app.show_schedule(&mut page, 5, at(2024, 3, 1, 8)).unwrap();
        book(&mut app, &mut page, "10:00 - 11:00", "Alice");

        app.change_month(&mut page, 2024, 3).unwrap();
        let april = app.show_schedule(&mut page, 5, at(2024, 3, 1, 8)).unwrap();
        assert_eq!(april.header, "Bookings for 2024-04-05");
        assert!(april.rows[4].booked);
        assert_eq!(april.rows[4].status, "Booked by Alice");
    }

    #[test]
    fn confirmed_cancellation_reopens_the_slot() {
        let mut app = app();
        let mut page = PageState::new(2024, 2);
        let now = at(2024, 3, 1, 8);
        app.show_schedule(&mut page, 15, now).unwrap();
        book(&mut app, &mut page, "9:00 - 10:00", "Alice");

        let prompt = app.request_cancellation(&page, 15, "9:00 - 10:00", now).unwrap();
        assert!(matches!(prompt, Notification::ConfirmCancel { day: 15, .. }));

        assert_eq!(app.cancel_booking(&mut page, 15, "9:00 - 10:00", false, now), Ok(false));
        assert!(app.store().find_slot(15, "9:00 - 10:00").unwrap().is_booked());

        assert_eq!(app.cancel_booking(&mut page, 15, "9:00 - 10:00", true, now), Ok(true));
        assert!(app.store().find_slot(15, "9:00 - 10:00").unwrap().is_open());

        let notice = book(&mut app, &mut page, "9:00 - 10:00", "Bob");
        assert!(notice.is_success());
    }

    #[test]
    fn cancellation_is_refused_close_to_start() {
        let mut app = app();
        let mut page = PageState::new(2024, 2);
        app.show_schedule(&mut page, 15, at(2024, 3, 1, 8)).unwrap();
        book(&mut app, &mut page, "9:00 - 10:00", "Alice");

        let late = at(2024, 3, 15, 8);
        assert_eq!(
            app.request_cancellation(&page, 15, "9:00 - 10:00", late),
            Err(BookingError::CancellationWindowClosed("9:00 - 10:00".to_string()))
        );
        assert!(app.cancel_booking(&mut page, 15, "9:00 - 10:00", true, late).is_err());
        assert!(app.store().find_slot(15, "9:00 - 10:00").unwrap().is_booked());
    }

    #[test]
    fn cancellation_can_be_switched_off() {
        let features = BookingFeatures {
            supports_cancellation: false,
            persists: false,
        };
        let mut app = BookingApp::new(MemoryStore::new(), features);
        let mut page = PageState::new(2024, 2);
        let now = at(2024, 3, 1, 8);
        app.show_schedule(&mut page, 15, now).unwrap();
        book(&mut app, &mut page, "9:00 - 10:00", "Alice");

        assert_eq!(
            app.request_cancellation(&page, 15, "9:00 - 10:00", now),
            Err(BookingError::CancellationDisabled)
        );
        assert_eq!(app.store().stored_snapshot(), None);
    }

    #[test]
    fn persisted_bookings_seed_a_new_app() {
        let mut backend = MemoryStore::new();
        {
            let mut app = BookingApp::new(backend.clone(), BookingFeatures::default());
            let mut page = PageState::new(2024, 2);
            app.show_schedule(&mut page, 8, at(2024, 3, 1, 8)).unwrap();
            book(&mut app, &mut page, "20:00 - 21:00", "Alice");
            let raw = app.store().stored_snapshot().unwrap();
            backend.set_item(AVAILABILITY_KEY, raw).unwrap();
        }

        let app = BookingApp::new(backend, BookingFeatures::default());
        assert_eq!(
            app.store().find_slot(8, "20:00 - 21:00").unwrap().booker(),
            Some("Alice")
        );
    }

    #[test]
    fn days_missing_from_the_month_are_refused() {
        let mut app = app();
        let mut page = PageState::new(2024, 1);
        let now = at(2024, 2, 1, 8);

        for day in [0, 30, 40, u32::MAX] {
            assert_eq!(
                app.show_schedule(&mut page, day, now).unwrap_err(),
                BookingError::DayOutOfRange(day)
            );
        }
        assert_eq!(page.selected_day, None);
        assert!(app.store().availability().is_empty());

        let view = app.show_schedule(&mut page, 29, now).unwrap();
        assert_eq!(view.header, "Bookings for 2024-02-29");
    }

    #[test]
    fn refused_days_do_not_spoil_the_stored_snapshot() {
        let mut backend = MemoryStore::new();
        {
            let mut app = BookingApp::new(backend.clone(), BookingFeatures::default());
            let mut page = PageState::new(2024, 2);
            let now = at(2024, 3, 1, 8);
            assert!(app.show_schedule(&mut page, 0, now).is_err());
            app.show_schedule(&mut page, 5, now).unwrap();
            assert!(book(&mut app, &mut page, "9:00 - 10:00", "Alice").is_success());
            backend.set_item(AVAILABILITY_KEY, app.store().stored_snapshot().unwrap()).unwrap();
        }

        let app = BookingApp::new(backend, BookingFeatures::default());
        assert_eq!(
            app.store().find_slot(5, "9:00 - 10:00").unwrap().booker(),
            Some("Alice")
        );
        assert!(!app.store().availability().contains_key(&0));
    }

    #[test]
    fn month_change_rolls_over_and_refuses_the_unrepresentable() {
        let app = app();
        let mut page = PageState::new(2024, 2);

        app.change_month(&mut page, 2024, 12).unwrap();
        assert_eq!((page.year, page.month), (2025, 0));

        app.change_month(&mut page, 2024, -1).unwrap();
        assert_eq!((page.year, page.month), (2023, 11));

        for (year, month) in [(2024, i32::MAX), (2024, i32::MIN), (i32::MAX, 12)] {
            assert_eq!(
                app.change_month(&mut page, year, month),
                Err(BookingError::MonthOutOfRange)
            );
        }
        assert_eq!((page.year, page.month), (2023, 11));
    }
}
