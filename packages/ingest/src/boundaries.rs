//! Administrative boundary loading with fallback chain.
//!
//! Loads per-level `GeoJSON` files, standardizes their columns, and fills
//! the gaps: a missing LLG file substitutes districts at level 3, and
//! missing coarser levels are dissolved up from their children. Which
//! fallback fired is surfaced through [`DataCompleteness`], never inferred.

use std::fs;
use std::path::Path;

use geojson::{FeatureCollection, GeoJson};

use conflict_map_geography::{
    BoundaryUnit, dissolve_to_parent, standardize_features, substitute_level,
};
use conflict_map_geography_models::{AdminLevel, DataCompleteness};

use crate::IngestError;

/// Boundary file names expected per level.
const ADMIN1_FILE: &str = "admin1_provinces.geojson";
const ADMIN2_FILE: &str = "admin2_districts.geojson";
const ADMIN3_FILE: &str = "admin3_llgs.geojson";

/// Standardized boundaries for all three levels plus completeness status.
pub struct LoadedBoundaries {
    /// Level-1 units.
    pub provinces: Vec<BoundaryUnit>,
    /// Level-2 units.
    pub districts: Vec<BoundaryUnit>,
    /// Level-3 units.
    pub llgs: Vec<BoundaryUnit>,
    /// Which fallbacks, if any, were taken during loading.
    pub completeness: DataCompleteness,
}

/// Loads and standardizes boundaries from a directory of per-level
/// `GeoJSON` files.
///
/// Absent files trigger the fallback chain; an entirely empty directory
/// yields empty levels with [`DataCompleteness::Degraded`].
///
/// # Errors
///
/// Returns an error only when a file that exists cannot be read or parsed.
pub fn load_boundaries(dir: &Path) -> Result<LoadedBoundaries, IngestError> {
    let provinces = read_collection(&dir.join(ADMIN1_FILE))?;
    let districts = read_collection(&dir.join(ADMIN2_FILE))?;
    let llgs = read_collection(&dir.join(ADMIN3_FILE))?;
    Ok(assemble(provinces, districts, llgs))
}

fn non_empty(units: Vec<BoundaryUnit>, level: AdminLevel) -> Option<Vec<BoundaryUnit>> {
    if units.is_empty() {
        log::warn!("Boundary source for level {level} has no usable features");
        None
    } else {
        Some(units)
    }
}

fn read_collection(path: &Path) -> Result<Option<FeatureCollection>, IngestError> {
    if !path.exists() {
        log::warn!("Boundary file {} not found", path.display());
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let geojson: GeoJson = content.parse()?;
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(Some(collection)),
        GeoJson::Feature(feature) => Ok(Some(FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        })),
        GeoJson::Geometry(_) => {
            log::warn!(
                "Boundary file {} is a bare geometry; expected a feature collection",
                path.display()
            );
            Ok(None)
        }
    }
}

/// Assembles the three levels from whatever sources were present.
///
/// A source that was present but standardized to zero units counts as
/// absent: the same fallback chain fires and the completeness status
/// reflects it.
#[must_use]
pub fn assemble(
    provinces: Option<FeatureCollection>,
    districts: Option<FeatureCollection>,
    llgs: Option<FeatureCollection>,
) -> LoadedBoundaries {
    let standardize = |fc: FeatureCollection, level| non_empty(standardize_features(&fc, level), level);
    let provinces = provinces.and_then(|fc| standardize(fc, AdminLevel::Province));
    let districts = districts.and_then(|fc| standardize(fc, AdminLevel::District));
    let llgs = llgs.and_then(|fc| standardize(fc, AdminLevel::Llg));

    let mut completeness = DataCompleteness::Full;

    let llgs = match (llgs, &districts) {
        (Some(llgs), _) => llgs,
        (None, Some(districts)) => {
            completeness = completeness.worst(DataCompleteness::SubstitutedLevel);
            substitute_level(districts)
        }
        (None, None) => {
            log::warn!("No level-3 or level-2 boundaries available");
            completeness = completeness.worst(DataCompleteness::Degraded);
            Vec::new()
        }
    };

    let districts = districts.unwrap_or_else(|| dissolve_to_parent(&llgs));
    let provinces = provinces.unwrap_or_else(|| dissolve_to_parent(&districts));

    log::info!(
        "Boundaries ready: {} provinces, {} districts, {} LLGs ({completeness})",
        provinces.len(),
        districts.len(),
        llgs.len()
    );

    LoadedBoundaries {
        provinces,
        districts,
        llgs,
        completeness,
    }
}
