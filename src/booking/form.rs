use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::schedule::slot_labels;

/// Values currently held by the booking form's fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingForm {
    pub name: String,
    pub time_slot: String,
}

impl BookingForm {
    /// Clears the name and puts the slot selector back on its first option.
    pub fn reset(&mut self) {
        self.name.clear();
        self.time_slot = slot_labels().into_iter().next().unwrap_or_default();
    }
}

/// UI state of one page: the year/month selectors, the selected day and the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub year: i32,
    /// Zero-based month, as held by the month selector
    pub month: i32,
    pub selected_day: Option<u32>,
    pub form: BookingForm,
}

impl PageState {
    pub fn new(year: i32, month: i32) -> Self {
        PageState {
            year,
            month,
            selected_day: None,
            form: BookingForm::default(),
        }
    }

    /// Page opened on `today`'s month with nothing selected.
    pub fn starting_on(today: NaiveDate) -> Self {
        PageState::new(today.year(), today.month0() as i32)
    }
}
