use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

/// Feature switches distinguishing the booking widget variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFeatures {
    pub supports_cancellation: bool,
    pub persists: bool,
}

impl Default for BookingFeatures {
    fn default() -> Self {
        BookingFeatures {
            supports_cancellation: true,
            persists: true,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "slot-booking", version, about = "Hourly appointment booking calendar")]
pub struct Cli {
    /// File holding the persisted availability
    #[arg(
        long,
        global = true,
        env = "SLOT_BOOKING_STORAGE",
        default_value = "booking_storage.json"
    )]
    pub storage: PathBuf,

    /// Keep bookings in memory only
    #[arg(long, global = true, env = "SLOT_BOOKING_NO_PERSIST")]
    pub no_persist: bool,

    /// Disable cancelling bookings
    #[arg(long, global = true, env = "SLOT_BOOKING_NO_CANCELLATION")]
    pub no_cancellation: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SLOT_BOOKING_LOG", default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn features(&self) -> BookingFeatures {
        BookingFeatures {
            supports_cancellation: !self.no_cancellation,
            persists: !self.no_persist,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the booking page over HTTP
    Serve {
        #[arg(long, env = "SLOT_BOOKING_PORT", default_value_t = 8080)]
        port: u16,

        /// Cookie signing key, at least 64 bytes; random per process if unset
        #[arg(long, env = "SLOT_BOOKING_SESSION_KEY")]
        session_key: Option<String>,
    },
    /// Print the calendar grid of a month
    Calendar(MonthArgs),
    /// Print the slots of a day
    Schedule {
        #[command(flatten)]
        month: MonthArgs,
        #[arg(long)]
        day: u32,
    },
    /// Book a slot
    Book {
        #[command(flatten)]
        month: MonthArgs,
        #[arg(long)]
        day: u32,
        /// Slot label, e.g. "9:00 - 10:00"
        #[arg(long)]
        time: String,
        #[arg(long)]
        name: String,
    },
    /// Cancel a booking
    Cancel {
        #[command(flatten)]
        month: MonthArgs,
        #[arg(long)]
        day: u32,
        #[arg(long)]
        time: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Write every booked slot to a CSV file
    Export {
        #[arg(long, short, default_value = "bookings.csv")]
        output: PathBuf,
    },
}

/// Year and month selection; both default to the current date.
#[derive(Args, Debug, Clone, Copy)]
pub struct MonthArgs {
    #[arg(long)]
    pub year: Option<i32>,

    /// Month number, 1 to 12
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}

/// Years offered by the year selector: the current year plus and minus two.
pub fn selectable_years(current_year: i32) -> Vec<i32> {
    (current_year - 2..=current_year + 2).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_turn_features_off() {
        let cli = Cli::parse_from(["slot-booking", "--no-persist", "calendar"]);
        assert_eq!(
            cli.features(),
            BookingFeatures {
                supports_cancellation: true,
                persists: false
            }
        );
    }

    #[test]
    fn book_command_parses() {
        let cli = Cli::parse_from([
            "slot-booking",
            "book",
            "--year",
            "2024",
            "--month",
            "3",
            "--day",
            "10",
            "--time",
            "6:00 - 7:00",
            "--name",
            "Alice",
        ]);
        match cli.command {
            Command::Book { month, day, time, name } => {
                assert_eq!(month.year, Some(2024));
                assert_eq!(month.month, Some(3));
                assert_eq!(day, 10);
                assert_eq!(time, "6:00 - 7:00");
                assert_eq!(name, "Alice");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["slot-booking", "calendar", "--month", "13"]).is_err());
    }

    #[test]
    fn log_level_must_name_a_level() {
        let cli = Cli::parse_from(["slot-booking", "--log-level", "debug", "calendar"]);
        assert_eq!(cli.log_level, tracing::Level::DEBUG);

        let cli = Cli::parse_from(["slot-booking", "calendar"]);
        assert_eq!(cli.log_level, tracing::Level::INFO);

        let err = Cli::try_parse_from(["slot-booking", "--log-level", "verbose", "calendar"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn year_selector_spans_five_years() {
        assert_eq!(selectable_years(2026), vec![2024, 2025, 2026, 2027, 2028]);
    }
}
