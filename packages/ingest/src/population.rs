//! LLG population table loading.
//!
//! Accepts either a two-column CSV (`pcode,population`) or a `GeoJSON`
//! file whose feature properties carry a pcode and population count. An
//! absent file is not an error: classification degrades to zero-population
//! behavior and the caller is told via [`DataCompleteness::Degraded`].

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use geojson::GeoJson;
use serde::Deserialize;

use conflict_map_geography_models::DataCompleteness;

use crate::IngestError;

/// Property keys tried, in order, when reading populations from `GeoJSON`.
const PCODE_KEYS: &[&str] = &["ADM3_PCODE", "PCODE", "pcode"];
const POPULATION_KEYS: &[&str] = &["pop_count", "population", "POP", "T_TL"];

#[derive(Debug, Deserialize)]
struct PopulationRow {
    pcode: String,
    population: u64,
}

/// Loads per-LLG populations from a CSV or `GeoJSON` file.
///
/// # Errors
///
/// Returns an error when a file that exists cannot be read or parsed.
pub fn load_population(path: &Path) -> Result<(BTreeMap<String, u64>, DataCompleteness), IngestError> {
    if !path.exists() {
        log::warn!(
            "Population file {} not found; death rates will be zero",
            path.display()
        );
        return Ok((BTreeMap::new(), DataCompleteness::Degraded));
    }

    let populations = if path.extension() == Some(OsStr::new("csv")) {
        read_population_csv(path)?
    } else {
        read_population_geojson(path)?
    };

    log::info!(
        "Loaded populations for {} units from {}",
        populations.len(),
        path.display()
    );
    Ok((populations, DataCompleteness::Full))
}

fn read_population_csv(path: &Path) -> Result<BTreeMap<String, u64>, IngestError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut populations = BTreeMap::new();
    for row in reader.deserialize::<PopulationRow>() {
        let row = row?;
        populations.insert(row.pcode, row.population);
    }
    Ok(populations)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn read_population_geojson(path: &Path) -> Result<BTreeMap<String, u64>, IngestError> {
    let content = fs::read_to_string(path)?;
    let geojson: GeoJson = content.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        log::warn!(
            "Population file {} is not a feature collection",
            path.display()
        );
        return Ok(BTreeMap::new());
    };

    let mut populations = BTreeMap::new();
    for feature in &collection.features {
        let Some(properties) = &feature.properties else {
            continue;
        };
        let pcode = PCODE_KEYS
            .iter()
            .find_map(|key| properties.get(*key).and_then(|value| value.as_str()));
        let population = POPULATION_KEYS.iter().find_map(|key| {
            properties.get(*key).and_then(|value| {
                value
                    .as_u64()
                    .or_else(|| value.as_f64().map(|count| count.max(0.0) as u64))
            })
        });
        if let (Some(pcode), Some(population)) = (pcode, population) {
            populations.insert(pcode.to_string(), population);
        }
    }
    Ok(populations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_table_loads() {
        let path = temp_file(
            "conflict_map_pop_test.csv",
            "pcode,population\nL1,10000\nL2,25000\n",
        );
        let (populations, completeness) = load_population(&path).unwrap();
        assert_eq!(completeness, DataCompleteness::Full);
        assert_eq!(populations.get("L1"), Some(&10000));
        assert_eq!(populations.get("L2"), Some(&25000));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn geojson_properties_load() {
        let path = temp_file(
            "conflict_map_pop_test.geojson",
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":null,
                 "properties":{"ADM3_PCODE":"L1","pop_count":10000.0}},
                {"type":"Feature","geometry":null,
                 "properties":{"PCODE":"L2","population":25000}}
            ]}"#,
        );
        let (populations, completeness) = load_population(&path).unwrap();
        assert_eq!(completeness, DataCompleteness::Full);
        assert_eq!(populations.get("L1"), Some(&10000));
        assert_eq!(populations.get("L2"), Some(&25000));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_degrades() {
        let path = std::env::temp_dir().join("conflict_map_pop_missing.csv");
        let (populations, completeness) = load_population(&path).unwrap();
        assert!(populations.is_empty());
        assert_eq!(completeness, DataCompleteness::Degraded);
    }
}
