//! Level-3 unit assembly and population roll-up.

use std::collections::BTreeMap;

use conflict_map_geography_models::{AdminLevel, LlgUnit};

use crate::standardize::BoundaryUnit;

/// Joins standardized level-3 boundary units with their population counts.
///
/// Every boundary unit produces exactly one [`LlgUnit`]; pcodes missing
/// from the population table get population 0. An LLG with no recorded
/// district or province ancestor falls back to its own pcode, forming a
/// single-member group at the coarser levels.
#[must_use]
pub fn build_llg_units(
    boundaries: &[BoundaryUnit],
    population: &BTreeMap<String, u64>,
) -> Vec<LlgUnit> {
    let mut missing_population = 0_usize;

    let units: Vec<LlgUnit> = boundaries
        .iter()
        .map(|boundary| {
            let attrs = &boundary.unit;
            let pop = population.get(&attrs.pcode).copied().unwrap_or_else(|| {
                missing_population += 1;
                0
            });

            let district_pcode = attrs
                .parent_pcode
                .clone()
                .unwrap_or_else(|| attrs.pcode.clone());
            let district_name = attrs
                .parent_name
                .clone()
                .unwrap_or_else(|| district_pcode.clone());
            let province_pcode = attrs
                .province_pcode
                .clone()
                .unwrap_or_else(|| district_pcode.clone());
            let province_name = attrs
                .province_name
                .clone()
                .unwrap_or_else(|| province_pcode.clone());

            LlgUnit {
                pcode: attrs.pcode.clone(),
                name: attrs.name.clone(),
                district_pcode,
                district_name,
                province_pcode,
                province_name,
                population: pop,
            }
        })
        .collect();

    if missing_population > 0 {
        log::warn!(
            "{missing_population} of {} LLGs have no population record; treated as 0",
            units.len()
        );
    }

    units
}

/// Sums LLG populations up to the given level, keyed by ancestor pcode.
///
/// The roll-up is a pure sum with no double counting: totals at a level
/// always equal the sum of their children's totals.
#[must_use]
pub fn rollup_population(units: &[LlgUnit], level: AdminLevel) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for unit in units {
        let (pcode, _) = unit.ancestor(level);
        *totals.entry(pcode.to_string()).or_insert(0) += unit.population;
    }
    totals
}
