#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The classify-and-roll-up pipeline.
//!
//! Takes matched events, aggregates fatalities per unit and month, filters
//! to a requested window, classifies every level-3 unit against the dual
//! rate/count thresholds, and rolls the classification up to a coarser
//! administrative level.
//!
//! Everything here is a pure function of its inputs: no I/O, no hidden
//! state, and degraded inputs (no population, no conflict rows) produce a
//! complete all-zero result rather than an error.

pub mod aggregate;
pub mod cache;
pub mod classify;
pub mod period;

pub use aggregate::aggregate_monthly;
pub use cache::AnalysisCache;
pub use classify::classify;
pub use period::filter_period;
