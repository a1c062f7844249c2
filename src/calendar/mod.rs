pub mod grid;

pub use grid::{month_layout, normalize_month, slot_start_time};
