pub mod controller;
pub mod form;

pub use controller::{BookingApp, Notification};
pub use form::PageState;
