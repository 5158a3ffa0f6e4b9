#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary standardization and administrative hierarchy assembly.
//!
//! Source boundary files carry arbitrary, inconsistent column names. This
//! crate maps them onto the canonical pcode/name schema, substitutes a
//! finer level when a requested one is absent, synthesizes coarser-level
//! geometry by unioning child units, and joins level-3 units with their
//! externally-supplied population counts.
//!
//! Every function here is total: missing identifiers degrade to positional
//! fallbacks with a logged warning, never to an error.

pub mod dissolve;
pub mod hierarchy;
pub mod standardize;

pub use dissolve::dissolve_to_parent;
pub use hierarchy::{build_llg_units, rollup_population};
pub use standardize::{BoundaryUnit, standardize_features, substitute_level};
