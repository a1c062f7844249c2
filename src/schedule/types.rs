use serde::{Deserialize, Serialize};

/// Status of a slot nobody has booked
pub const OPEN_STATUS: &str = "Open for booking";

/// Every booked status starts with this prefix
pub const BOOKED_PREFIX: &str = "Booked";

/// Builds the booked status label carrying the booker's name.
pub fn booked_status(name: &str) -> String {
    format!("{} by {}", BOOKED_PREFIX, name)
}

/// One bookable hour within a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub time: String,
    pub status: String,
}

impl Slot {
    pub fn open(time: impl Into<String>) -> Self {
        Slot {
            time: time.into(),
            status: OPEN_STATUS.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OPEN_STATUS
    }

    pub fn is_booked(&self) -> bool {
        self.status.starts_with(BOOKED_PREFIX)
    }

    /// Name carried by a booked status, if any.
    pub fn booker(&self) -> Option<&str> {
        self.status
            .strip_prefix(BOOKED_PREFIX)
            .and_then(|rest| rest.strip_prefix(" by "))
    }
}

/// The full, ordered set of slots for one day.
///
/// Slots are only ever mutated in place: there is no way to add, remove or
/// reorder entries once the schedule exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySchedule {
    slots: Vec<Slot>,
}

impl DaySchedule {
    pub(crate) fn from_slots(slots: Vec<Slot>) -> Self {
        DaySchedule { slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn find(&self, time: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.time == time)
    }

    pub fn find_mut(&mut self, time: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|slot| slot.time == time)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
