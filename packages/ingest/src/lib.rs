#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data loading and session management.
//!
//! This crate is the externally-owned loading/caching collaborator the
//! pipeline is injected with: it reads event CSVs, boundary `GeoJSON`, and
//! population tables once per session, runs the spatial join once, and
//! hands the pure pipeline already-materialized in-memory data.
//!
//! Missing input files degrade to empty datasets with an explicit
//! completeness status; only genuine I/O and parse failures of present
//! files surface as errors.

pub mod boundaries;
pub mod events;
pub mod population;
pub mod session;

pub use boundaries::{LoadedBoundaries, load_boundaries};
pub use events::load_events;
pub use population::load_population;
pub use session::DataSession;

use thiserror::Error;

/// Errors that can occur while loading source data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Reading a source file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
