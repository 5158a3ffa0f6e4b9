//! Month-window filtering of aggregated records.

use conflict_map_analytics_models::{MonthlyFatalities, PeriodSpec};

/// Returns the subset of records whose `(year, month)` falls inside the
/// window. Pure: the input is never mutated and no ordering is imposed on
/// the output beyond the input's own.
#[must_use]
pub fn filter_period(records: &[MonthlyFatalities], period: &PeriodSpec) -> Vec<MonthlyFatalities> {
    records
        .iter()
        .filter(|record| period.contains(record.year, record.month))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, month: u32) -> MonthlyFatalities {
        MonthlyFatalities {
            pcode: "L1".to_string(),
            year,
            month,
            state: 1,
            nonstate: 0,
            unknown: 0,
        }
    }

    #[test]
    fn same_year_range_selects_inclusive_months() {
        let records = vec![row(2021, 2), row(2021, 3), row(2021, 5), row(2021, 6)];
        let filtered = filter_period(&records, &PeriodSpec::new(2021, 3, 2021, 5));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| (3..=5).contains(&r.month)));
    }

    #[test]
    fn year_crossing_window_keeps_both_halves() {
        let records = vec![
            row(2020, 6),
            row(2020, 7),
            row(2020, 12),
            row(2021, 1),
            row(2021, 6),
            row(2021, 7),
        ];
        let filtered = filter_period(&records, &PeriodSpec::mid_year(2020));
        let kept: Vec<(i32, u32)> = filtered.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(
            kept,
            vec![(2020, 7), (2020, 12), (2021, 1), (2021, 6)],
            "Jul 2020 - Jun 2021 must include both year halves and exclude the months beyond"
        );
    }

    #[test]
    fn filtering_does_not_mutate_input() {
        let records = vec![row(2021, 1), row(2022, 1)];
        let _ = filter_period(&records, &PeriodSpec::calendar_year(2021));
        assert_eq!(records.len(), 2);
    }
}
