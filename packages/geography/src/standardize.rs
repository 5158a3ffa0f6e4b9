//! Source-column standardization for boundary files.
//!
//! Maps arbitrary source property names (`PROVNAME`, `DIST_CODE`,
//! `ADM3_PCODE`, ...) onto the canonical pcode/name fields for a level.
//! The matching is a heuristic adapter that lives only at this loading
//! boundary: downstream code never sees raw source names.

use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection};
use serde_json::Value;

use conflict_map_geography_models::{AdminLevel, AdminUnit};

/// A standardized administrative unit with its polygon geometry.
///
/// Geometry is WGS-84 longitude/latitude (RFC 7946) and is never mutated
/// after load.
#[derive(Debug, Clone)]
pub struct BoundaryUnit {
    /// Canonical attributes.
    pub unit: AdminUnit,
    /// Polygon or multipolygon footprint.
    pub polygon: MultiPolygon<f64>,
}

/// Property-name tokens identifying each admin level in source columns.
const fn level_tokens(level: AdminLevel) -> &'static [&'static str] {
    match level {
        AdminLevel::Province => &["PROV", "REGION", "ADM1"],
        AdminLevel::District => &["DIST", "ADM2"],
        AdminLevel::Llg => &["LLG", "ADM3"],
    }
}

const CODE_TOKENS: &[&str] = &["PCODE", "CODE", "ID"];
const NAME_TOKENS: &[&str] = &["NAME", "EN"];

fn property_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finds the pcode and name for one admin level among a feature's
/// properties. Returns `(pcode, name)`, either of which may be absent.
fn find_level_fields(feature: &Feature, level: AdminLevel) -> (Option<String>, Option<String>) {
    let Some(properties) = &feature.properties else {
        return (None, None);
    };

    let mut pcode = None;
    let mut name = None;

    // serde_json maps iterate in sorted key order, so ties resolve
    // deterministically.
    for (key, value) in properties {
        let key_upper = key.to_uppercase();
        if !level_tokens(level)
            .iter()
            .any(|token| key_upper.contains(token))
        {
            continue;
        }

        if CODE_TOKENS.iter().any(|token| key_upper.contains(token)) {
            if pcode.is_none() {
                pcode = property_string(value);
            }
        } else if NAME_TOKENS.iter().any(|token| key_upper.contains(token)) && name.is_none() {
            name = property_string(value);
        }
    }

    (pcode, name)
}

fn feature_polygon(feature: &Feature, index: usize) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.as_ref()?;
    let geo_geometry: geo::Geometry<f64> = geometry.value.clone().try_into().ok()?;
    match geo_geometry {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        other => {
            log::warn!(
                "Skipping feature {index}: unsupported geometry type {:?}",
                std::mem::discriminant(&other)
            );
            None
        }
    }
}

/// Standardizes a boundary feature collection into canonical units at the
/// given level.
///
/// For each feature, the unit's own pcode/name are resolved first, then the
/// ancestor fields the level calls for (district and province for LLGs,
/// province for districts). Missing identifiers fall back to the positional
/// index with `synthesized_pcode` set; missing names echo the pcode.
/// Features without usable polygon geometry are skipped.
#[must_use]
pub fn standardize_features(
    collection: &FeatureCollection,
    level: AdminLevel,
) -> Vec<BoundaryUnit> {
    let mut units = Vec::with_capacity(collection.features.len());
    let mut synthesized = 0_usize;

    for (index, feature) in collection.features.iter().enumerate() {
        let Some(polygon) = feature_polygon(feature, index) else {
            continue;
        };

        let (own_pcode, own_name) = find_level_fields(feature, level);
        let synthesized_pcode = own_pcode.is_none();
        if synthesized_pcode {
            synthesized += 1;
        }
        let pcode = own_pcode.unwrap_or_else(|| index.to_string());
        let name = own_name.unwrap_or_else(|| pcode.clone());

        let (parent_pcode, parent_name) = match level.parent() {
            Some(parent_level) => {
                let (p, n) = find_level_fields(feature, parent_level);
                let n = n.or_else(|| p.clone());
                (p, n)
            }
            None => (None, None),
        };

        let (province_pcode, province_name) = match level {
            AdminLevel::Province => (Some(pcode.clone()), Some(name.clone())),
            AdminLevel::District => (parent_pcode.clone(), parent_name.clone()),
            AdminLevel::Llg => {
                let (p, n) = find_level_fields(feature, AdminLevel::Province);
                let n = n.or_else(|| p.clone());
                (p, n)
            }
        };

        units.push(BoundaryUnit {
            unit: AdminUnit {
                level,
                pcode,
                name,
                parent_pcode,
                parent_name,
                province_pcode,
                province_name,
                synthesized_pcode,
            },
            polygon,
        });
    }

    if synthesized > 0 {
        log::warn!(
            "Standardized {} {level} units; {synthesized} had no identifier column and use \
             positional pcodes with no semantic mapping",
            units.len()
        );
    } else {
        log::info!("Standardized {} {level} units", units.len());
    }

    units
}

/// Reuses district units as LLGs when no level-3 source exists.
///
/// Each district becomes a single-member LLG whose parent is itself, so
/// every downstream grouping still resolves. Callers must surface this as
/// [`conflict_map_geography_models::DataCompleteness::SubstitutedLevel`].
#[must_use]
pub fn substitute_level(districts: &[BoundaryUnit]) -> Vec<BoundaryUnit> {
    log::warn!(
        "No LLG boundaries available; substituting {} district units as level 3",
        districts.len()
    );
    districts
        .iter()
        .map(|district| BoundaryUnit {
            unit: AdminUnit {
                level: AdminLevel::Llg,
                pcode: district.unit.pcode.clone(),
                name: district.unit.name.clone(),
                parent_pcode: Some(district.unit.pcode.clone()),
                parent_name: Some(district.unit.name.clone()),
                province_pcode: district.unit.province_pcode.clone(),
                province_name: district.unit.province_name.clone(),
                synthesized_pcode: district.unit.synthesized_pcode,
            },
            polygon: district.polygon.clone(),
        })
        .collect()
}
