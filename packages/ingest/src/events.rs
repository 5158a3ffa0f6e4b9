//! Conflict event CSV loading.
//!
//! Reads ACLED-style export CSVs. Unknown columns are ignored; rows with
//! unparseable dates or fatality counts are skipped with a warning rather
//! than failing the whole load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use conflict_map_conflict_models::ConflictEvent;

use crate::IngestError;

/// One raw CSV row, before validation.
#[derive(Debug, Deserialize)]
struct RawEventRow {
    event_date: String,
    event_type: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    fatalities: Option<i64>,
    interaction: Option<String>,
}

/// Date formats seen across dataset exports.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %B %Y", "%d-%b-%y"];

fn parse_event_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Loads events from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid CSV.
pub fn load_events(path: &Path) -> Result<Vec<ConflictEvent>, IngestError> {
    let file = File::open(path)?;
    let events = read_events(file)?;
    log::info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Reads events from any CSV source.
///
/// # Errors
///
/// Returns an error if the input is not valid CSV.
pub fn read_events<R: Read>(reader: R) -> Result<Vec<ConflictEvent>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut events = Vec::new();
    let mut skipped = 0_usize;

    for row in csv_reader.deserialize::<RawEventRow>() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                log::warn!("Skipping malformed event row: {err}");
                skipped += 1;
                continue;
            }
        };

        let Some(event_date) = parse_event_date(&row.event_date) else {
            log::warn!("Skipping event with unparseable date {:?}", row.event_date);
            skipped += 1;
            continue;
        };

        let fatalities = match row.fatalities {
            Some(n) if n >= 0 => u64::try_from(n).unwrap_or(0),
            Some(n) => {
                log::warn!("Skipping event with negative fatality count {n}");
                skipped += 1;
                continue;
            }
            None => 0,
        };

        let interaction = row.interaction.filter(|text| !text.trim().is_empty());

        events.push(ConflictEvent {
            event_date,
            event_type: row.event_type,
            latitude: row.latitude,
            longitude: row.longitude,
            fatalities,
            interaction,
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed event rows");
    }
    Ok(events)
}
