#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Conflict event types and the violence-type taxonomy.
//!
//! This crate defines the canonical actor-type taxonomy used across the
//! entire conflict-map system. Every event record derives exactly one
//! [`ViolenceType`] from its free-text actor-interaction field, and that
//! classification is never re-derived downstream.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Event types excluded from battle-related-death selection by default.
///
/// The dataset treats protest events as a separate phenomenon even when
/// fatalities are recorded against them. Riots are kept: they frequently
/// carry significant casualties in this dataset.
pub const DEFAULT_EXCLUDED_EVENT_TYPES: &[&str] = &["Protests"];

/// Actor-type classification for a conflict event.
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
pub enum ViolenceType {
    /// At least one state actor was involved.
    State,
    /// Only non-state actors were involved.
    Nonstate,
    /// The actor-interaction field was missing, so no classification
    /// could be made.
    Unknown,
}

impl ViolenceType {
    /// Classifies an event from its free-text actor-interaction field.
    ///
    /// A missing field yields [`Self::Unknown`]; a field containing the
    /// substring "state forces" (case-insensitive) yields [`Self::State`];
    /// anything else is [`Self::Nonstate`]. The classification is total:
    /// every input maps to exactly one variant.
    #[must_use]
    pub fn from_interaction(interaction: Option<&str>) -> Self {
        match interaction {
            None => Self::Unknown,
            Some(text) => {
                if text.to_lowercase().contains("state forces") {
                    Self::State
                } else {
                    Self::Nonstate
                }
            }
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::State, Self::Nonstate, Self::Unknown]
    }
}

/// A raw conflict event row as loaded from the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictEvent {
    /// Calendar day the event occurred.
    pub event_date: NaiveDate,
    /// Source event category (e.g. "Battles", "Riots", "Protests").
    pub event_type: String,
    /// Latitude in decimal degrees, if the event was geocoded.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, if the event was geocoded.
    pub longitude: Option<f64>,
    /// Reported fatality count.
    pub fatalities: u64,
    /// Free-text actor-interaction field from the source.
    pub interaction: Option<String>,
}

impl ConflictEvent {
    /// Derives the actor-type classification for this event.
    #[must_use]
    pub fn violence_type(&self) -> ViolenceType {
        ViolenceType::from_interaction(self.interaction.as_deref())
    }

    /// Returns `(longitude, latitude)` if both coordinates are present.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lng), Some(lat)) => Some((lng, lat)),
            _ => None,
        }
    }

    /// Calendar year of the event.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.event_date.year()
    }

    /// Calendar month of the event (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.event_date.month()
    }

    /// Whether this event counts as a battle-related-death (BRD) event:
    /// at least one fatality and not in an excluded event category.
    #[must_use]
    pub fn is_brd(&self, excluded_event_types: &[&str]) -> bool {
        self.fatalities > 0
            && !excluded_event_types
                .iter()
                .any(|excluded| self.event_type == *excluded)
    }
}

/// Filters a raw event set down to BRD events.
#[must_use]
pub fn brd_events(events: &[ConflictEvent], excluded_event_types: &[&str]) -> Vec<ConflictEvent> {
    events
        .iter()
        .filter(|event| event.is_brd(excluded_event_types))
        .cloned()
        .collect()
}

/// A conflict event after assignment to its containing level-3
/// administrative unit, reduced to the fields aggregation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedEvent {
    /// Pcode of the containing level-3 unit.
    pub pcode: String,
    /// Calendar year of the event.
    pub year: i32,
    /// Calendar month of the event (1-12).
    pub month: u32,
    /// Actor-type classification, derived once at match time.
    pub violence_type: ViolenceType,
    /// Reported fatality count.
    pub fatalities: u64,
}
