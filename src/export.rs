use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::StorageError;
use crate::store::Availability;

/// Writes one CSV row per booked slot: `day,time,booker,status`.
///
/// Rows come out ordered by day, then by the catalog's slot order. Returns the
/// number of bookings written.
pub fn write_bookings<W: Write>(
    availability: &Availability,
    writer: W,
) -> Result<usize, StorageError> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    wtr.write_record(["day", "time", "booker", "status"])?;

    let mut written = 0;
    for (day, schedule) in availability {
        for slot in schedule.slots().iter().filter(|slot| slot.is_booked()) {
            let day = day.to_string();
            wtr.write_record([
                day.as_str(),
                slot.time.as_str(),
                slot.booker().unwrap_or(""),
                slot.status.as_str(),
            ])?;
            written += 1;
        }
    }

    wtr.flush()?;
    Ok(written)
}

/// Exports every booking to a CSV file, replacing any existing file.
pub fn export_bookings_to_csv(
    availability: &Availability,
    csv_path: &Path,
) -> Result<usize, StorageError> {
    let file = File::create(csv_path)?;
    write_bookings(availability, file)
}
