#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index for event attribution.
//!
//! Builds an R-tree over level-3 administrative polygons and assigns each
//! conflict event to the unit whose interior contains its point. This is
//! the expensive step of the pipeline; it runs once per dataset version and
//! its output is memoized by the session layer.
//!
//! Both sides are WGS-84 longitude/latitude: polygons come from RFC 7946
//! `GeoJSON` (which mandates that CRS) and event coordinates are decimal
//! degrees from the source dataset.

use geo::{Contains, MultiPolygon};
use rstar::{AABB, RTree, RTreeObject};

use conflict_map_conflict_models::{ConflictEvent, MatchedEvent};
use conflict_map_geography_models::MatchSummary;

/// An administrative polygon stored in the R-tree with its pcode.
struct UnitEntry {
    pcode: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for UnitEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built spatial index over level-3 administrative units.
///
/// Constructed once per dataset and shared across all analysis requests.
/// Lookup is a bounding-box R-tree probe followed by an exact
/// point-in-polygon test, so a full join runs in `O((N + M) log M)` rather
/// than `O(N x M)`.
pub struct UnitIndex {
    tree: RTree<UnitEntry>,
}

impl UnitIndex {
    /// Builds the index from `(pcode, polygon)` pairs.
    #[must_use]
    pub fn build(units: impl IntoIterator<Item = (String, MultiPolygon<f64>)>) -> Self {
        let entries: Vec<UnitEntry> = units
            .into_iter()
            .map(|(pcode, polygon)| UnitEntry {
                pcode,
                envelope: compute_envelope(&polygon),
                polygon,
            })
            .collect();
        log::info!("Built spatial index over {} level-3 units", entries.len());
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Looks up the pcode of the unit whose interior contains the point.
    ///
    /// Administrative units tile the country without overlap, so the first
    /// containing polygon wins. Points on a shared boundary are contained
    /// by no unit's interior and return `None`.
    #[must_use]
    pub fn locate(&self, lng: f64, lat: f64) -> Option<&str> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        for entry in self.tree.locate_in_envelope_intersecting(&query_env) {
            if entry.polygon.contains(&point) {
                return Some(&entry.pcode);
            }
        }
        None
    }
}

/// Result of joining an event set against a [`UnitIndex`].
pub struct MatchOutcome {
    /// Events assigned to a containing unit, reduced to aggregation fields.
    pub matched: Vec<MatchedEvent>,
    /// Accounting of excluded events.
    pub summary: MatchSummary,
}

/// Assigns each event to the level-3 unit containing its point.
///
/// Events lacking coordinates, and events whose point falls inside no
/// indexed polygon, are excluded from the output and tallied in the
/// summary. They are never counted at a default or guessed location.
#[must_use]
pub fn match_events(index: &UnitIndex, events: &[ConflictEvent]) -> MatchOutcome {
    let mut matched = Vec::with_capacity(events.len());
    let mut summary = MatchSummary::default();

    for event in events {
        let Some((lng, lat)) = event.coordinates() else {
            summary.missing_coordinates += 1;
            continue;
        };

        match index.locate(lng, lat) {
            Some(pcode) => {
                matched.push(MatchedEvent {
                    pcode: pcode.to_string(),
                    year: event.year(),
                    month: event.month(),
                    violence_type: event.violence_type(),
                    fatalities: event.fatalities,
                });
                summary.matched += 1;
            }
            None => summary.unmatched += 1,
        }
    }

    log::info!(
        "Matched {} of {} events ({:.1}%); {} outside all units, {} without coordinates",
        summary.matched,
        summary.total(),
        summary.matched_share() * 100.0,
        summary.unmatched,
        summary.missing_coordinates
    );

    MatchOutcome { matched, summary }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    use geo::BoundingRect;

    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
