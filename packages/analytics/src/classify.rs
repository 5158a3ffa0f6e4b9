//! Violence-affected classification and roll-up.

use std::collections::BTreeMap;

use conflict_map_analytics_models::{
    AggregatedUnitRecord, AnalysisRequest, AnalysisResult, MonthlyFatalities, RolledUpRecord,
};
use conflict_map_geography_models::{DataCompleteness, LlgUnit};

use crate::period::filter_period;

/// Runs one classify-and-roll-up request.
///
/// Every known level-3 unit appears exactly once in the output, whether or
/// not it had conflict rows in the period: the period-filtered fatality
/// sums are left-joined onto the full unit set, so a unit with population
/// but no recorded violence comes out with zero fatalities rather than
/// being dropped. With no population data at all, every unit classifies as
/// unaffected over a complete record set; with no conflict rows, likewise.
#[must_use]
pub fn classify(
    units: &[LlgUnit],
    monthly: &[MonthlyFatalities],
    request: &AnalysisRequest,
    completeness: DataCompleteness,
) -> AnalysisResult {
    let in_period = filter_period(monthly, &request.period);

    // Sum the filtered months down to one row per pcode.
    let mut period_sums: BTreeMap<&str, (u64, u64, u64)> = BTreeMap::new();
    for row in &in_period {
        let entry = period_sums.entry(row.pcode.as_str()).or_default();
        entry.0 += row.state;
        entry.1 += row.nonstate;
        entry.2 += row.unknown;
    }

    let mode = request.threshold_mode;
    let unit_records: Vec<AggregatedUnitRecord> = units
        .iter()
        .map(|unit| {
            let (state, nonstate, unknown) = period_sums
                .get(unit.pcode.as_str())
                .copied()
                .unwrap_or_default();
            let total = state + nonstate;
            let death_rate = death_rate_per_100k(total, unit.population);
            let violence_affected = mode.exceeds(death_rate, request.rate_threshold)
                && mode.exceeds(total, request.abs_threshold);

            AggregatedUnitRecord {
                pcode: unit.pcode.clone(),
                name: unit.name.clone(),
                district_pcode: unit.district_pcode.clone(),
                district_name: unit.district_name.clone(),
                province_pcode: unit.province_pcode.clone(),
                province_name: unit.province_name.clone(),
                population: unit.population,
                fatalities_state: state,
                fatalities_nonstate: nonstate,
                fatalities_unknown: unknown,
                fatalities_total: total,
                death_rate_per_100k: death_rate,
                violence_affected,
            }
        })
        .collect();

    let rollup = rollup(units, &unit_records, request);

    let affected = unit_records.iter().filter(|r| r.violence_affected).count();
    log::info!(
        "Classified {} units for {}: {affected} affected, rolled up to {} {} units",
        unit_records.len(),
        request.period.label(),
        rollup.len(),
        request.agg_level
    );

    AnalysisResult {
        units: unit_records,
        rollup,
        completeness,
    }
}

#[allow(clippy::cast_precision_loss)]
fn death_rate_per_100k(fatalities: u64, population: u64) -> f64 {
    if population == 0 {
        0.0
    } else {
        fatalities as f64 / population as f64 * 100_000.0
    }
}

#[allow(clippy::cast_precision_loss)]
fn zero_guarded_share(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn rollup(
    units: &[LlgUnit],
    records: &[AggregatedUnitRecord],
    request: &AnalysisRequest,
) -> Vec<RolledUpRecord> {
    struct Group {
        name: String,
        total_population: u64,
        total_units: u64,
        affected_units: u64,
        affected_population: u64,
        total_fatalities: u64,
    }

    let mut groups: BTreeMap<String, Group> = BTreeMap::new();

    for (unit, record) in units.iter().zip(records) {
        let (pcode, name) = unit.ancestor(request.agg_level);
        let group = groups.entry(pcode.to_string()).or_insert_with(|| Group {
            name: name.to_string(),
            total_population: 0,
            total_units: 0,
            affected_units: 0,
            affected_population: 0,
            total_fatalities: 0,
        });

        group.total_population += unit.population;
        group.total_units += 1;
        group.total_fatalities += record.fatalities_total;
        if record.violence_affected {
            group.affected_units += 1;
            group.affected_population += unit.population;
        }
    }

    groups
        .into_iter()
        .map(|(pcode, group)| {
            let share_units = zero_guarded_share(group.affected_units, group.total_units);
            RolledUpRecord {
                pcode,
                name: group.name,
                total_population: group.total_population,
                total_units: group.total_units,
                affected_units: group.affected_units,
                affected_population: group.affected_population,
                share_units_affected: share_units,
                share_population_affected: zero_guarded_share(
                    group.affected_population,
                    group.total_population,
                ),
                total_fatalities: group.total_fatalities,
                above_threshold: request
                    .threshold_mode
                    .exceeds(share_units, request.agg_share_threshold),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use conflict_map_analytics_models::{PeriodSpec, ThresholdMode};
    use conflict_map_geography_models::AdminLevel;

    fn llg(pcode: &str, district: &str, province: &str, population: u64) -> LlgUnit {
        LlgUnit {
            pcode: pcode.to_string(),
            name: format!("{pcode} name"),
            district_pcode: district.to_string(),
            district_name: format!("{district} name"),
            province_pcode: province.to_string(),
            province_name: format!("{province} name"),
            population,
        }
    }

    fn monthly(pcode: &str, year: i32, month: u32, nonstate: u64) -> MonthlyFatalities {
        MonthlyFatalities {
            pcode: pcode.to_string(),
            year,
            month,
            state: 0,
            nonstate,
            unknown: 0,
        }
    }

    fn request(rate: f64, abs: u64, level: AdminLevel, share: f64) -> AnalysisRequest {
        AnalysisRequest {
            period: PeriodSpec::calendar_year(2021),
            rate_threshold: rate,
            abs_threshold: abs,
            agg_level: level,
            agg_share_threshold: share,
            threshold_mode: ThresholdMode::Strict,
        }
    }

    /// Three LLGs under one province; 6 and 2 fatalities in March 2021.
    fn scenario() -> (Vec<LlgUnit>, Vec<MonthlyFatalities>) {
        let units = vec![
            llg("L1", "D1", "P1", 10000),
            llg("L2", "D1", "P1", 20000),
            llg("L3", "D2", "P1", 5000),
        ];
        let rows = vec![monthly("L1", 2021, 3, 6), monthly("L2", 2021, 3, 2)];
        (units, rows)
    }

    #[test]
    fn end_to_end_scenario_classifies_and_rolls_up() {
        let (units, rows) = scenario();
        let result = classify(
            &units,
            &rows,
            &request(10.0, 5, AdminLevel::Province, 0.5),
            DataCompleteness::Full,
        );

        let l1 = result.units.iter().find(|r| r.pcode == "L1").unwrap();
        assert!((l1.death_rate_per_100k - 60.0).abs() < 1e-9);
        assert!(l1.violence_affected);

        // Rate exactly 10.0 per 100k: boundary, strictly not affected.
        let l2 = result.units.iter().find(|r| r.pcode == "L2").unwrap();
        assert!((l2.death_rate_per_100k - 10.0).abs() < 1e-9);
        assert!(!l2.violence_affected);

        let l3 = result.units.iter().find(|r| r.pcode == "L3").unwrap();
        assert_eq!(l3.fatalities_total, 0);
        assert!(!l3.violence_affected);

        assert_eq!(result.rollup.len(), 1);
        let province = &result.rollup[0];
        assert_eq!(province.pcode, "P1");
        assert_eq!(province.total_units, 3);
        assert_eq!(province.affected_units, 1);
        assert!((province.share_units_affected - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(province.affected_population, 10000);
        assert_eq!(province.total_population, 35000);
        assert!((province.share_population_affected - 10000.0 / 35000.0).abs() < 1e-9);
        assert_eq!(province.total_fatalities, 8);
        assert!(!province.above_threshold);
    }

    #[test]
    fn strict_thresholds_reject_boundary_values() {
        let units = vec![llg("L1", "D1", "P1", 60000)];
        // 6 fatalities / 60000 * 100k = 10.0 exactly; count 6 > 5.
        let rows = vec![monthly("L1", 2021, 3, 6)];
        let result = classify(
            &units,
            &rows,
            &request(10.0, 5, AdminLevel::Province, 0.5),
            DataCompleteness::Full,
        );
        assert!(!result.units[0].violence_affected);

        // Nudge the rate above the threshold and it qualifies.
        let units = vec![llg("L1", "D1", "P1", 59000)];
        let result = classify(
            &units,
            &rows,
            &request(10.0, 5, AdminLevel::Province, 0.5),
            DataCompleteness::Full,
        );
        assert!(result.units[0].violence_affected);
    }

    #[test]
    fn inclusive_mode_accepts_boundary_values() {
        let units = vec![llg("L1", "D1", "P1", 60000)];
        let rows = vec![monthly("L1", 2021, 3, 6)];
        let mut req = request(10.0, 6, AdminLevel::Province, 1.0);
        req.threshold_mode = ThresholdMode::Inclusive;

        let result = classify(&units, &rows, &req, DataCompleteness::Full);
        assert!(result.units[0].violence_affected);
        // Share is exactly 1.0 == threshold; inclusive flags it.
        assert!(result.rollup[0].above_threshold);
    }

    #[test]
    fn absent_rows_classify_like_explicit_zero_rows() {
        let units = vec![llg("L1", "D1", "P1", 10000), llg("L2", "D1", "P1", 10000)];
        // L1 has an explicit zero-fatality row; L2 has no row at all.
        let rows = vec![monthly("L1", 2021, 3, 0)];
        let result = classify(
            &units,
            &rows,
            &request(10.0, 5, AdminLevel::Province, 0.5),
            DataCompleteness::Full,
        );

        let l1 = result.units.iter().find(|r| r.pcode == "L1").unwrap();
        let l2 = result.units.iter().find(|r| r.pcode == "L2").unwrap();
        assert_eq!(l1.fatalities_total, l2.fatalities_total);
        assert_eq!(l1.violence_affected, l2.violence_affected);
        assert!((l1.death_rate_per_100k - l2.death_rate_per_100k).abs() < f64::EPSILON);
    }

    #[test]
    fn records_outside_period_are_ignored() {
        let units = vec![llg("L1", "D1", "P1", 1000)];
        let rows = vec![monthly("L1", 2019, 3, 50)];
        let result = classify(
            &units,
            &rows,
            &request(10.0, 5, AdminLevel::Province, 0.5),
            DataCompleteness::Full,
        );
        assert_eq!(result.units[0].fatalities_total, 0);
        assert!(!result.units[0].violence_affected);
    }

    #[test]
    fn unknown_fatalities_are_reported_but_excluded_from_total() {
        let units = vec![llg("L1", "D1", "P1", 1000)];
        let rows = vec![MonthlyFatalities {
            pcode: "L1".to_string(),
            year: 2021,
            month: 3,
            state: 2,
            nonstate: 3,
            unknown: 40,
        }];
        let result = classify(
            &units,
            &rows,
            &request(10.0, 5, AdminLevel::Province, 0.5),
            DataCompleteness::Full,
        );
        let record = &result.units[0];
        assert_eq!(record.fatalities_total, 5);
        assert_eq!(record.fatalities_unknown, 40);
        // Rate is computed from the classified total only.
        assert!((record.death_rate_per_100k - 500.0).abs() < 1e-9);
    }

    #[test]
    fn zero_population_everywhere_yields_complete_unflagged_output() {
        let units = vec![llg("L1", "D1", "P1", 0), llg("L2", "D2", "P2", 0)];
        let rows = vec![monthly("L1", 2021, 3, 100)];
        let result = classify(
            &units,
            &rows,
            &request(10.0, 5, AdminLevel::Province, 0.5),
            DataCompleteness::Degraded,
        );

        assert_eq!(result.units.len(), 2);
        for record in &result.units {
            assert!(record.death_rate_per_100k.abs() < f64::EPSILON);
            assert!(!record.violence_affected);
        }
        for roll in &result.rollup {
            assert!(roll.share_population_affected.abs() < f64::EPSILON);
            assert!(!roll.share_population_affected.is_nan());
        }
        assert_eq!(result.completeness, DataCompleteness::Degraded);
    }

    #[test]
    fn empty_conflict_input_yields_all_zero_output() {
        let (units, _) = scenario();
        let result = classify(
            &units,
            &[],
            &request(10.0, 5, AdminLevel::District, 0.5),
            DataCompleteness::Full,
        );
        assert_eq!(result.units.len(), 3);
        assert!(result.units.iter().all(|r| r.fatalities_total == 0));
        assert!(result.units.iter().all(|r| !r.violence_affected));
        assert_eq!(result.rollup.len(), 2);
    }

    #[test]
    fn shares_stay_within_unit_interval() {
        let (units, rows) = scenario();
        for level in [AdminLevel::Province, AdminLevel::District] {
            let result = classify(
                &units,
                &rows,
                &request(0.0, 0, level, 0.5),
                DataCompleteness::Full,
            );
            for roll in &result.rollup {
                assert!((0.0..=1.0).contains(&roll.share_units_affected));
                assert!((0.0..=1.0).contains(&roll.share_population_affected));
            }
        }
    }

    #[test]
    fn district_rollup_groups_by_district() {
        let (units, rows) = scenario();
        let result = classify(
            &units,
            &rows,
            &request(10.0, 5, AdminLevel::District, 0.2),
            DataCompleteness::Full,
        );

        assert_eq!(result.rollup.len(), 2);
        let d1 = result.rollup.iter().find(|r| r.pcode == "D1").unwrap();
        assert_eq!(d1.total_units, 2);
        assert_eq!(d1.affected_units, 1);
        assert!((d1.share_units_affected - 0.5).abs() < 1e-9);
        assert!(d1.above_threshold);

        let d2 = result.rollup.iter().find(|r| r.pcode == "D2").unwrap();
        assert_eq!(d2.affected_units, 0);
        assert!(!d2.above_threshold);
    }
}
