//! Per-request result caching.
//!
//! Caching is a pure performance optimization: entries are keyed by the
//! full parameter tuple plus a dataset version token, so a cold cache and
//! a warm cache always produce identical results.

use std::collections::HashMap;
use std::sync::Arc;

use conflict_map_analytics_models::{AnalysisRequest, AnalysisResult};

/// In-memory cache of analysis results.
#[derive(Default)]
pub struct AnalysisCache {
    entries: HashMap<String, Arc<AnalysisResult>>,
}

impl AnalysisCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the cache key for a request against a dataset version.
    ///
    /// The dataset version token must change whenever the underlying
    /// boundary, population, or event data changes, so stale results can
    /// never be served across a reload.
    #[must_use]
    pub fn key(dataset_version: &str, request: &AnalysisRequest) -> String {
        let digest = md5::compute(format!("{dataset_version}|{request:?}"));
        format!("{digest:x}")
    }

    /// Returns the cached result for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<AnalysisResult>> {
        self.entries.get(key).cloned()
    }

    /// Stores a result and returns the shared handle.
    pub fn insert(&mut self, key: String, result: AnalysisResult) -> Arc<AnalysisResult> {
        let shared = Arc::new(result);
        self.entries.insert(key, Arc::clone(&shared));
        shared
    }

    /// Drops every cached entry (e.g. after a dataset reload).
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// Number of cached results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
