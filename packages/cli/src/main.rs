#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the conflict map pipeline.

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use conflict_map_analytics_models::{
    AnalysisRequest, PeriodSpec, ThresholdMode, twelve_month_periods,
};
use conflict_map_export::{write_monthly_records, write_rollup_records, write_unit_records};
use conflict_map_geography_models::AdminLevel;
use conflict_map_ingest::DataSession;

#[derive(Parser)]
#[command(name = "conflict_map_cli", about = "Conflict data analysis pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load events and boundaries, run the spatial join, and export
    /// per-unit monthly fatality aggregates
    Process {
        /// Conflict event CSV export
        #[arg(long)]
        events: PathBuf,
        /// Directory containing `admin{1,2,3}_*.geojson` boundary files
        #[arg(long)]
        boundaries: PathBuf,
        /// LLG population table (CSV or `GeoJSON`)
        #[arg(long)]
        population: PathBuf,
        /// Output CSV path for monthly aggregates
        #[arg(long, default_value = "monthly_fatalities.csv")]
        output: PathBuf,
    },
    /// Classify LLGs as violence-affected over a month window and roll
    /// the classification up to a coarser level
    Classify {
        /// Conflict event CSV export
        #[arg(long)]
        events: PathBuf,
        /// Directory containing `admin{1,2,3}_*.geojson` boundary files
        #[arg(long)]
        boundaries: PathBuf,
        /// LLG population table (CSV or `GeoJSON`)
        #[arg(long)]
        population: PathBuf,
        /// First month of the window, as `YYYY-MM`
        #[arg(long, value_parser = parse_month)]
        start: (i32, u32),
        /// Last month of the window (inclusive), as `YYYY-MM`
        #[arg(long, value_parser = parse_month)]
        end: (i32, u32),
        /// Death-rate threshold per 100,000 population
        #[arg(long, default_value = "10.0")]
        rate_threshold: f64,
        /// Absolute fatality-count threshold
        #[arg(long, default_value = "5")]
        abs_threshold: u64,
        /// Roll-up level: "province" or "district"
        #[arg(long, default_value = "province", value_parser = parse_agg_level)]
        agg_level: AdminLevel,
        /// Share-of-affected-units threshold for the roll-up flag
        #[arg(long, default_value = "0.1")]
        agg_share_threshold: f64,
        /// Treat boundary values as meeting the thresholds
        #[arg(long)]
        inclusive: bool,
        /// Output CSV path for classified LLG records
        #[arg(long, default_value = "classified_units.csv")]
        units_output: PathBuf,
        /// Output CSV path for rolled-up records
        #[arg(long, default_value = "rollup.csv")]
        rollup_output: PathBuf,
    },
    /// List the standard 12-month analysis windows
    Periods {
        /// First year to generate windows for
        #[arg(long, default_value = "1997")]
        from: i32,
        /// Last year to generate windows for
        #[arg(long, default_value = "2025")]
        to: i32,
    },
}

fn parse_month(text: &str) -> Result<(i32, u32), String> {
    let (year, month) = text
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got {text:?}"))?;
    let year: i32 = year
        .parse()
        .map_err(|_| format!("invalid year in {text:?}"))?;
    let month: u32 = month
        .parse()
        .map_err(|_| format!("invalid month in {text:?}"))?;
    if !(1..=12).contains(&month) {
        return Err(format!("month must be 1-12, got {month}"));
    }
    Ok((year, month))
}

/// Builds the analysis window, rejecting a start after the end.
///
/// `PeriodSpec::contains` assumes an ordered window; an inverted pair
/// would silently select the complement of the intended months.
fn build_period(start: (i32, u32), end: (i32, u32)) -> Result<PeriodSpec, String> {
    if start > end {
        return Err(format!(
            "window start {}-{:02} is after its end {}-{:02}",
            start.0, start.1, end.0, end.1
        ));
    }
    Ok(PeriodSpec::new(start.0, start.1, end.0, end.1))
}

fn parse_agg_level(text: &str) -> Result<AdminLevel, String> {
    match text.to_lowercase().as_str() {
        "province" | "adm1" | "1" => Ok(AdminLevel::Province),
        "district" | "adm2" | "2" => Ok(AdminLevel::District),
        _ => Err(format!(
            "unknown aggregation level {text:?}: expected \"province\" or \"district\""
        )),
    }
}

#[allow(clippy::too_many_lines)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            events,
            boundaries,
            population,
            output,
        } => {
            let start = Instant::now();
            let session = DataSession::from_paths(&events, &boundaries, &population)?;

            let summary = session.summary();
            println!(
                "Matched {} of {} events ({:.1}%)",
                summary.matched,
                summary.total(),
                summary.matched_share() * 100.0
            );
            println!("Data completeness: {}", session.completeness());

            write_monthly_records(File::create(&output)?, session.monthly())?;
            println!(
                "Wrote {} monthly rows to {} in {:.1?}",
                session.monthly().len(),
                output.display(),
                start.elapsed()
            );
        }
        Commands::Classify {
            events,
            boundaries,
            population,
            start,
            end,
            rate_threshold,
            abs_threshold,
            agg_level,
            agg_share_threshold,
            inclusive,
            units_output,
            rollup_output,
        } => {
            let timer = Instant::now();
            let period = build_period(start, end)?;
            let mut session = DataSession::from_paths(&events, &boundaries, &population)?;

            let request = AnalysisRequest {
                period,
                rate_threshold,
                abs_threshold,
                agg_level,
                agg_share_threshold,
                threshold_mode: if inclusive {
                    ThresholdMode::Inclusive
                } else {
                    ThresholdMode::Strict
                },
            };
            log::info!("Classifying {} window", request.period.label());

            let result = session.analyze(&request);
            let affected = result
                .units
                .iter()
                .filter(|unit| unit.violence_affected)
                .count();
            println!(
                "{} of {} LLGs violence-affected for {}",
                affected,
                result.units.len(),
                request.period.label()
            );
            println!("Data completeness: {}", result.completeness);

            write_unit_records(File::create(&units_output)?, &result.units)?;
            write_rollup_records(File::create(&rollup_output)?, &result.rollup)?;
            println!(
                "Wrote {} and {} in {:.1?}",
                units_output.display(),
                rollup_output.display(),
                timer.elapsed()
            );
        }
        Commands::Periods { from, to } => {
            for period in twelve_month_periods(from, to) {
                println!("{}", period.label());
            }
        }
    }

    Ok(())
}
