#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV export of analysis outputs.
//!
//! Columns are emitted in struct declaration order, so downstream
//! consumers see a stable schema across runs.

use std::io::Write;

use thiserror::Error;

use conflict_map_analytics_models::{AggregatedUnitRecord, MonthlyFatalities, RolledUpRecord};

/// Errors that can occur while writing output files.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing to the output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes one CSV row per classified level-3 unit.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write_unit_records<W: Write>(
    writer: W,
    records: &[AggregatedUnitRecord],
) -> Result<(), ExportError> {
    write_records(writer, records)
}

/// Writes one CSV row per aggregation unit.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write_rollup_records<W: Write>(
    writer: W,
    records: &[RolledUpRecord],
) -> Result<(), ExportError> {
    write_records(writer, records)
}

/// Writes one CSV row per unit-month fatality aggregate.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write_monthly_records<W: Write>(
    writer: W,
    records: &[MonthlyFatalities],
) -> Result<(), ExportError> {
    write_records(writer, records)
}

fn write_records<W: Write, T: serde::Serialize>(
    writer: W,
    records: &[T],
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    log::debug!("Wrote {} CSV rows", records.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_record(pcode: &str, affected: bool) -> AggregatedUnitRecord {
        AggregatedUnitRecord {
            pcode: pcode.to_string(),
            name: format!("Llg {pcode}"),
            district_pcode: "D1".to_string(),
            district_name: "District One".to_string(),
            province_pcode: "P1".to_string(),
            province_name: "Province One".to_string(),
            population: 10_000,
            fatalities_state: 4,
            fatalities_nonstate: 2,
            fatalities_unknown: 1,
            fatalities_total: 6,
            death_rate_per_100k: 60.0,
            violence_affected: affected,
        }
    }

    #[test]
    fn unit_csv_has_stable_header_and_rows() {
        let mut buffer = Vec::new();
        write_unit_records(&mut buffer, &[unit_record("L1", true), unit_record("L2", false)])
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "pcode,name,district_pcode,district_name,province_pcode,province_name,population,\
             fatalities_state,fatalities_nonstate,fatalities_unknown,fatalities_total,\
             death_rate_per_100k,violence_affected"
        );
        assert!(lines.next().unwrap().starts_with("L1,Llg L1,"));
        assert!(lines.next().unwrap().ends_with("false"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn rollup_csv_round_trips_shares() {
        let record = RolledUpRecord {
            pcode: "P1".to_string(),
            name: "Province One".to_string(),
            total_population: 35_000,
            total_units: 3,
            affected_units: 1,
            affected_population: 10_000,
            share_units_affected: 1.0 / 3.0,
            share_population_affected: 10_000.0 / 35_000.0,
            total_fatalities: 6,
            above_threshold: true,
        };

        let mut buffer = Vec::new();
        write_rollup_records(&mut buffer, std::slice::from_ref(&record)).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let parsed: RolledUpRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn monthly_csv_uses_plain_field_names() {
        let row = MonthlyFatalities {
            pcode: "L1".to_string(),
            year: 2021,
            month: 3,
            state: 1,
            nonstate: 0,
            unknown: 0,
        };
        let mut buffer = Vec::new();
        write_monthly_records(&mut buffer, std::slice::from_ref(&row)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("pcode,year,month,state,nonstate,unknown\n"));
    }

    #[test]
    fn empty_input_writes_nothing() {
        let mut buffer = Vec::new();
        write_monthly_records(&mut buffer, &[]).unwrap();
        // Headers come from serialize calls, so an empty set is an empty file.
        assert!(buffer.is_empty());
    }
}
