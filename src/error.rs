use thiserror::Error;

/// Outcomes of a refused state transition. None of these are fatal; the page
/// shows the message and keeps running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Please select a day first")]
    NoDaySelected,

    #[error("Day {0} is not in the selected month")]
    DayOutOfRange(u32),

    #[error("The selected month is outside the supported calendar range")]
    MonthOutOfRange,

    #[error("The {0} slot is already booked, please choose another time")]
    SlotConflict(String),

    // Reported with the same wording as a conflict
    #[error("The {0} slot is already booked, please choose another time")]
    SlotNotFound(String),

    #[error("The {0} slot has no booking to cancel")]
    NotBooked(String),

    #[error("Cancellation is not available")]
    CancellationDisabled,

    #[error("The {0} slot starts within 2 hours and can no longer be cancelled")]
    CancellationWindowClosed(String),
}

/// Failures of the key-value store standing in for the browser's local storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
