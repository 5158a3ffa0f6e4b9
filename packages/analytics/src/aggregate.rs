//! Temporal aggregation of matched events.

use std::collections::BTreeMap;

use conflict_map_analytics_models::MonthlyFatalities;
use conflict_map_conflict_models::{MatchedEvent, ViolenceType};

/// Groups matched events by `(pcode, year, month)` and sums fatalities per
/// actor type.
///
/// Only combinations present in the input produce a row; units and months
/// with no matched events are zero-filled downstream at classification
/// time, not here. Keys are held in a `BTreeMap`, so output order is fully
/// determined by the input set and re-aggregation is byte-identical.
#[must_use]
pub fn aggregate_monthly(matched: &[MatchedEvent]) -> Vec<MonthlyFatalities> {
    let mut groups: BTreeMap<(String, i32, u32), (u64, u64, u64)> = BTreeMap::new();

    for event in matched {
        let entry = groups
            .entry((event.pcode.clone(), event.year, event.month))
            .or_default();
        match event.violence_type {
            ViolenceType::State => entry.0 += event.fatalities,
            ViolenceType::Nonstate => entry.1 += event.fatalities,
            ViolenceType::Unknown => entry.2 += event.fatalities,
        }
    }

    let rows: Vec<MonthlyFatalities> = groups
        .into_iter()
        .map(
            |((pcode, year, month), (state, nonstate, unknown))| MonthlyFatalities {
                pcode,
                year,
                month,
                state,
                nonstate,
                unknown,
            },
        )
        .collect();

    log::info!(
        "Aggregated {} matched events into {} unit-month rows",
        matched.len(),
        rows.len()
    );
    rows
}
