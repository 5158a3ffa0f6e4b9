//! Dataset session: load once, analyze many times.
//!
//! A [`DataSession`] owns everything derived from one load of the source
//! files: the LLG hierarchy with populations, the monthly fatality rows
//! produced by the one-time spatial join, and a result cache keyed by a
//! dataset version token. Analysis requests against the same session are
//! pure lookups over that materialized state.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use conflict_map_analytics::{AnalysisCache, aggregate_monthly, classify};
use conflict_map_analytics_models::{AnalysisRequest, AnalysisResult, MonthlyFatalities};
use conflict_map_conflict_models::{ConflictEvent, DEFAULT_EXCLUDED_EVENT_TYPES, brd_events};
use conflict_map_geography::build_llg_units;
use conflict_map_geography_models::{DataCompleteness, LlgUnit, MatchSummary};
use conflict_map_spatial::{UnitIndex, match_events};

use crate::boundaries::{LoadedBoundaries, load_boundaries};
use crate::events::load_events;
use crate::population::load_population;
use crate::IngestError;

/// Materialized state for one loaded dataset.
pub struct DataSession {
    llg_units: Vec<LlgUnit>,
    monthly: Vec<MonthlyFatalities>,
    summary: MatchSummary,
    completeness: DataCompleteness,
    dataset_version: String,
    cache: AnalysisCache,
}

impl DataSession {
    /// Loads all source files and runs the one-time spatial join.
    ///
    /// # Errors
    ///
    /// Returns an error when a file that exists cannot be read or parsed.
    /// Absent files degrade rather than fail.
    pub fn from_paths(
        events_path: &Path,
        boundaries_dir: &Path,
        population_path: &Path,
    ) -> Result<Self, IngestError> {
        let boundaries = load_boundaries(boundaries_dir)?;
        let (populations, population_completeness) = load_population(population_path)?;
        let events = load_events(events_path)?;
        Ok(Self::assemble(
            boundaries,
            &populations,
            population_completeness,
            &events,
        ))
    }

    /// Builds a session from already-loaded inputs.
    ///
    /// Filters events to battle-related deaths, joins them against the
    /// level-3 polygons, and aggregates per unit and month.
    #[must_use]
    pub fn assemble(
        boundaries: LoadedBoundaries,
        populations: &BTreeMap<String, u64>,
        population_completeness: DataCompleteness,
        events: &[ConflictEvent],
    ) -> Self {
        let llg_units = build_llg_units(&boundaries.llgs, populations);

        let index = UnitIndex::build(
            boundaries
                .llgs
                .iter()
                .map(|unit| (unit.unit.pcode.clone(), unit.polygon.clone())),
        );

        let brd = brd_events(events, DEFAULT_EXCLUDED_EVENT_TYPES);
        log::info!(
            "{} of {} events are battle-related deaths",
            brd.len(),
            events.len()
        );

        let outcome = match_events(&index, &brd);
        let monthly = aggregate_monthly(&outcome.matched);

        let completeness = boundaries.completeness.worst(population_completeness);
        let dataset_version = version_token(&llg_units, &monthly);

        Self {
            llg_units,
            monthly,
            summary: outcome.summary,
            completeness,
            dataset_version,
            cache: AnalysisCache::new(),
        }
    }

    /// Runs (or replays from cache) one classification request.
    pub fn analyze(&mut self, request: &AnalysisRequest) -> Arc<AnalysisResult> {
        let key = AnalysisCache::key(&self.dataset_version, request);
        if let Some(result) = self.cache.get(&key) {
            log::debug!("Analysis cache hit for {key}");
            return result;
        }
        let result = classify(&self.llg_units, &self.monthly, request, self.completeness);
        self.cache.insert(key, result)
    }

    /// Level-3 units with populations, in pcode order.
    #[must_use]
    pub fn llg_units(&self) -> &[LlgUnit] {
        &self.llg_units
    }

    /// Per-unit monthly fatality rows for the full loaded range.
    #[must_use]
    pub fn monthly(&self) -> &[MonthlyFatalities] {
        &self.monthly
    }

    /// Accounting of the spatial join.
    #[must_use]
    pub const fn summary(&self) -> &MatchSummary {
        &self.summary
    }

    /// Worst completeness across all loaded sources.
    #[must_use]
    pub const fn completeness(&self) -> DataCompleteness {
        self.completeness
    }

    /// Token identifying the loaded dataset contents.
    #[must_use]
    pub fn dataset_version(&self) -> &str {
        &self.dataset_version
    }

    /// Drops all cached analysis results.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
    }
}

/// Derives a version token from the materialized session state.
///
/// Any change to the units or the joined monthly rows changes the token,
/// so cache keys from a previous load can never collide with this one.
fn version_token(llg_units: &[LlgUnit], monthly: &[MonthlyFatalities]) -> String {
    let digest = md5::compute(format!("{llg_units:?}|{monthly:?}"));
    format!("{digest:x}")
}
