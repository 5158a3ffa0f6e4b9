#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis request parameters and classification result types.
//!
//! Defines the input/output records of the classify-and-roll-up pipeline:
//! month windows, per-unit monthly fatality rows, classified unit records,
//! and rolled-up summaries for coarser administrative levels.

use serde::{Deserialize, Serialize};

use conflict_map_geography_models::{AdminLevel, DataCompleteness};

/// An inclusive month window, possibly crossing a calendar-year boundary.
///
/// Precondition: start precedes or equals end. The pipeline assumes the
/// caller has validated this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSpec {
    /// First year of the window.
    pub start_year: i32,
    /// First month of the window (1-12), within `start_year`.
    pub start_month: u32,
    /// Last year of the window.
    pub end_year: i32,
    /// Last month of the window (1-12), within `end_year`.
    pub end_month: u32,
}

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl PeriodSpec {
    /// Creates a window from inclusive `(year, month)` bounds.
    #[must_use]
    pub const fn new(start_year: i32, start_month: u32, end_year: i32, end_month: u32) -> Self {
        Self {
            start_year,
            start_month,
            end_year,
            end_month,
        }
    }

    /// A calendar-year window (January through December).
    #[must_use]
    pub const fn calendar_year(year: i32) -> Self {
        Self::new(year, 1, year, 12)
    }

    /// A mid-year window (July of `year` through June of the next year).
    #[must_use]
    pub const fn mid_year(year: i32) -> Self {
        Self::new(year, 7, year + 1, 6)
    }

    /// Whether the given `(year, month)` falls inside the window.
    #[must_use]
    pub const fn contains(&self, year: i32, month: u32) -> bool {
        if self.start_year == self.end_year {
            year == self.start_year && month >= self.start_month && month <= self.end_month
        } else {
            (year == self.start_year && month >= self.start_month)
                || (year > self.start_year && year < self.end_year)
                || (year == self.end_year && month <= self.end_month)
        }
    }

    /// Display label, e.g. "Jul 2020 - Jun 2021".
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} {} - {} {}",
            MONTH_ABBREV[(self.start_month as usize).saturating_sub(1).min(11)],
            self.start_year,
            MONTH_ABBREV[(self.end_month as usize).saturating_sub(1).min(11)],
            self.end_year
        )
    }
}

/// Generates the preset 12-month analysis windows over a year range:
/// one calendar-year window per year, plus mid-year (Jul-Jun) windows
/// offset by six months.
#[must_use]
pub fn twelve_month_periods(start_year: i32, end_year: i32) -> Vec<PeriodSpec> {
    let mut periods = Vec::new();
    for year in start_year..=end_year {
        periods.push(PeriodSpec::calendar_year(year));
    }
    for year in start_year..end_year {
        periods.push(PeriodSpec::mid_year(year));
    }
    periods
}

/// Fatality sums for one level-3 unit in one calendar month.
///
/// Only `(pcode, year, month)` combinations with at least one matched
/// event produce a row; an absent row means zero fatalities and the
/// classifier treats both identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyFatalities {
    /// Level-3 unit pcode.
    pub pcode: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Fatalities from events involving state forces.
    pub state: u64,
    /// Fatalities from events involving only non-state actors.
    pub nonstate: u64,
    /// Fatalities from events whose actor type could not be classified.
    /// Reported separately; never part of [`Self::total`].
    pub unknown: u64,
}

impl MonthlyFatalities {
    /// Classified fatality total (state + nonstate, excluding unknown).
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.state + self.nonstate
    }
}

/// Comparison policy for classification thresholds.
///
/// The legacy policy is strict (`>`): boundary values do not qualify.
/// Inclusive (`>=`) is available for consumers that expect closed bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Strict comparison: a value must exceed the threshold.
    #[default]
    Strict,
    /// Inclusive comparison: a value meeting the threshold qualifies.
    Inclusive,
}

impl ThresholdMode {
    /// Applies the comparison policy.
    #[must_use]
    pub fn exceeds<T: PartialOrd>(self, value: T, threshold: T) -> bool {
        match self {
            Self::Strict => value > threshold,
            Self::Inclusive => value >= threshold,
        }
    }
}

/// Parameters of one classify-and-roll-up request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Month window to analyze.
    pub period: PeriodSpec,
    /// Death-rate threshold, per 100,000 population.
    pub rate_threshold: f64,
    /// Absolute fatality-count threshold.
    pub abs_threshold: u64,
    /// Level to roll classified units up to (province or district).
    pub agg_level: AdminLevel,
    /// Share-of-affected-units threshold for the roll-up flag.
    pub agg_share_threshold: f64,
    /// Threshold comparison policy.
    #[serde(default)]
    pub threshold_mode: ThresholdMode,
}

/// One classified level-3 unit for the requested period.
///
/// Every known unit appears exactly once, whether or not any conflict was
/// recorded there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedUnitRecord {
    /// Level-3 pcode.
    pub pcode: String,
    /// LLG display name.
    pub name: String,
    /// Containing district pcode.
    pub district_pcode: String,
    /// Containing district name.
    pub district_name: String,
    /// Containing province pcode.
    pub province_pcode: String,
    /// Containing province name.
    pub province_name: String,
    /// Population count.
    pub population: u64,
    /// Fatalities from state violence in the period.
    pub fatalities_state: u64,
    /// Fatalities from non-state violence in the period.
    pub fatalities_nonstate: u64,
    /// Fatalities with unclassified actor type, reported separately and
    /// excluded from the total.
    pub fatalities_unknown: u64,
    /// Classified fatality total (state + nonstate).
    pub fatalities_total: u64,
    /// Deaths per 100,000 population; 0 when population is 0.
    pub death_rate_per_100k: f64,
    /// Whether the unit met both classification thresholds.
    pub violence_affected: bool,
}

/// A rolled-up summary for one province or district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolledUpRecord {
    /// Pcode of the aggregation unit.
    pub pcode: String,
    /// Display name of the aggregation unit.
    pub name: String,
    /// Sum of child LLG populations.
    pub total_population: u64,
    /// Count of child LLGs.
    pub total_units: u64,
    /// Count of child LLGs classified as violence-affected.
    pub affected_units: u64,
    /// Sum of population across affected child LLGs.
    pub affected_population: u64,
    /// `affected_units / total_units`; 0 when there are no units.
    pub share_units_affected: f64,
    /// `affected_population / total_population`; 0 when population is 0.
    pub share_population_affected: f64,
    /// Sum of child `fatalities_total`.
    pub total_fatalities: u64,
    /// Whether the affected-unit share met the roll-up threshold.
    pub above_threshold: bool,
}

/// Complete output of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// One record per known level-3 unit.
    pub units: Vec<AggregatedUnitRecord>,
    /// One record per aggregation unit at the requested level.
    pub rollup: Vec<RolledUpRecord>,
    /// Completeness of the inputs this result was computed from.
    pub completeness: DataCompleteness,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_year_window_is_a_month_range() {
        let period = PeriodSpec::new(2021, 3, 2021, 5);
        assert!(!period.contains(2021, 2));
        assert!(period.contains(2021, 3));
        assert!(period.contains(2021, 5));
        assert!(!period.contains(2021, 6));
        assert!(!period.contains(2020, 4));
    }

    #[test]
    fn year_crossing_window_wraps() {
        let period = PeriodSpec::new(2020, 7, 2021, 6);
        for month in 7..=12 {
            assert!(period.contains(2020, month), "2020-{month} should be in");
        }
        for month in 1..=6 {
            assert!(period.contains(2021, month), "2021-{month} should be in");
        }
        assert!(!period.contains(2020, 6));
        assert!(!period.contains(2021, 7));
    }

    #[test]
    fn multi_year_window_includes_interior_years() {
        let period = PeriodSpec::new(2019, 11, 2022, 2);
        assert!(period.contains(2020, 1));
        assert!(period.contains(2021, 12));
        assert!(!period.contains(2019, 10));
        assert!(!period.contains(2022, 3));
    }

    #[test]
    fn preset_periods_cover_calendar_and_mid_year() {
        let periods = twelve_month_periods(2020, 2022);
        // 3 calendar years + 2 mid-year windows.
        assert_eq!(periods.len(), 5);
        assert!(periods.contains(&PeriodSpec::calendar_year(2021)));
        assert!(periods.contains(&PeriodSpec::mid_year(2021)));
        assert!(!periods.contains(&PeriodSpec::mid_year(2022)));
    }

    #[test]
    fn period_label_formats_month_names() {
        assert_eq!(PeriodSpec::mid_year(2020).label(), "Jul 2020 - Jun 2021");
        assert_eq!(
            PeriodSpec::calendar_year(2021).label(),
            "Jan 2021 - Dec 2021"
        );
    }

    #[test]
    fn threshold_modes_differ_only_at_boundary() {
        assert!(!ThresholdMode::Strict.exceeds(10.0, 10.0));
        assert!(ThresholdMode::Inclusive.exceeds(10.0, 10.0));
        assert!(ThresholdMode::Strict.exceeds(10.01, 10.0));
        assert!(!ThresholdMode::Inclusive.exceeds(9.99, 10.0));
    }

    #[test]
    fn monthly_total_excludes_unknown() {
        let row = MonthlyFatalities {
            pcode: "L1".to_string(),
            year: 2021,
            month: 3,
            state: 4,
            nonstate: 2,
            unknown: 9,
        };
        assert_eq!(row.total(), 6);
    }
}
