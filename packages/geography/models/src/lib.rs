#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative hierarchy types for the three-tier
//! province / district / LLG structure.
//!
//! These types are the canonical output of boundary standardization.
//! The core pipeline only ever sees these already-canonicalized records,
//! never raw source column names.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Administrative level in the national hierarchy, from coarsest (province)
/// to finest (LLG, local-level government area).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminLevel {
    /// Level 1: provinces.
    Province = 1,
    /// Level 2: districts.
    District = 2,
    /// Level 3: local-level government areas.
    Llg = 3,
}

impl AdminLevel {
    /// Returns the numeric level (1-3).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates an admin level from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-3.
    pub const fn from_value(value: u8) -> Result<Self, InvalidLevelError> {
        match value {
            1 => Ok(Self::Province),
            2 => Ok(Self::District),
            3 => Ok(Self::Llg),
            _ => Err(InvalidLevelError { value }),
        }
    }

    /// Returns the next-coarser level, or `None` for provinces.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Province => None,
            Self::District => Some(Self::Province),
            Self::Llg => Some(Self::District),
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Province, Self::District, Self::Llg]
    }
}

/// Error returned when attempting to create an [`AdminLevel`] from an
/// invalid numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLevelError {
    /// The invalid level value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid admin level {}: expected 1-3", self.value)
    }
}

impl std::error::Error for InvalidLevelError {}

/// A canonical administrative unit row after source-column standardization.
///
/// Parent fields are populated for levels 2 and 3; province fields are the
/// level-1 ancestor and are populated for level 3 (for districts they equal
/// the parent fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUnit {
    /// Administrative level of this unit.
    pub level: AdminLevel,
    /// Stable place-code identifier, unique within the level.
    pub pcode: String,
    /// Human-readable display name.
    pub name: String,
    /// Pcode of the containing unit one level up.
    pub parent_pcode: Option<String>,
    /// Display name of the containing unit one level up.
    pub parent_name: Option<String>,
    /// Pcode of the level-1 ancestor.
    pub province_pcode: Option<String>,
    /// Display name of the level-1 ancestor.
    pub province_name: Option<String>,
    /// `true` when the source carried no identifier column and the pcode
    /// was synthesized from the positional index. Synthesized pcodes have
    /// no semantic mapping to any external code list.
    pub synthesized_pcode: bool,
}

/// A level-3 unit joined with its full ancestor chain and population.
///
/// This is the unit of classification: one record per LLG, regardless of
/// whether any conflict was recorded there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlgUnit {
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
    /// Population count, externally supplied (zonal statistics output).
    pub population: u64,
}

impl LlgUnit {
    /// Returns the `(pcode, name)` of this unit's ancestor at the given
    /// aggregation level. For [`AdminLevel::Llg`], the unit itself.
    #[must_use]
    pub fn ancestor(&self, level: AdminLevel) -> (&str, &str) {
        match level {
            AdminLevel::Province => (&self.province_pcode, &self.province_name),
            AdminLevel::District => (&self.district_pcode, &self.district_name),
            AdminLevel::Llg => (&self.pcode, &self.name),
        }
    }
}

/// Completeness status of a loaded boundary or population dataset.
///
/// Fallback chains (admin3 → admin2 substitution, missing population) are
/// surfaced explicitly through this tag rather than inferred from which
/// columns happen to exist.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DataCompleteness {
    /// All requested levels were loaded from their own source.
    Full,
    /// A requested level was absent and a finer level was substituted
    /// for it (e.g. districts standing in for LLGs).
    SubstitutedLevel,
    /// A required input was absent entirely; the affected values are
    /// zero-filled.
    Degraded,
}

impl DataCompleteness {
    /// Combines two statuses, keeping the worse of the two.
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Accounting for a spatial-join run: how many events landed inside a
/// known polygon and how many were excluded, and why.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    /// Events assigned to a containing level-3 unit.
    pub matched: u64,
    /// Events with coordinates that fell inside no known polygon.
    pub unmatched: u64,
    /// Events excluded up front for lacking coordinates.
    pub missing_coordinates: u64,
}

impl MatchSummary {
    /// Total events considered.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.matched + self.unmatched + self.missing_coordinates
    }

    /// Fraction of considered events that matched, 0 when none were
    /// considered.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn matched_share(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.matched as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_from_value_roundtrip() {
        for level in AdminLevel::all() {
            assert_eq!(AdminLevel::from_value(level.value()), Ok(*level));
        }
        assert!(AdminLevel::from_value(0).is_err());
        assert!(AdminLevel::from_value(4).is_err());
    }

    #[test]
    fn parent_chain_terminates_at_province() {
        assert_eq!(AdminLevel::Llg.parent(), Some(AdminLevel::District));
        assert_eq!(AdminLevel::District.parent(), Some(AdminLevel::Province));
        assert_eq!(AdminLevel::Province.parent(), None);
    }

    #[test]
    fn completeness_worst_orders_degradation() {
        assert_eq!(
            DataCompleteness::Full.worst(DataCompleteness::SubstitutedLevel),
            DataCompleteness::SubstitutedLevel
        );
        assert_eq!(
            DataCompleteness::Degraded.worst(DataCompleteness::Full),
            DataCompleteness::Degraded
        );
    }

    #[test]
    fn match_summary_share_guards_zero() {
        let empty = MatchSummary::default();
        assert!(empty.matched_share().abs() < f64::EPSILON);

        let summary = MatchSummary {
            matched: 3,
            unmatched: 1,
            missing_coordinates: 0,
        };
        assert!((summary.matched_share() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn llg_ancestor_selection() {
        let unit = LlgUnit {
            pcode: "PG0101A".to_string(),
            name: "Koiari Rural".to_string(),
            district_pcode: "PG0101".to_string(),
            district_name: "Abau".to_string(),
            province_pcode: "PG01".to_string(),
            province_name: "Central".to_string(),
            population: 12000,
        };
        assert_eq!(unit.ancestor(AdminLevel::Province), ("PG01", "Central"));
        assert_eq!(unit.ancestor(AdminLevel::District), ("PG0101", "Abau"));
        assert_eq!(unit.ancestor(AdminLevel::Llg), ("PG0101A", "Koiari Rural"));
    }
}
