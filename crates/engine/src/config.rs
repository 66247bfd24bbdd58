//! Tunables for report generation.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Controls pagination and parallelism of report generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Detail-list page size when the request does not set one.
    pub page_size: usize,
    /// Upper bound for a requested page size.
    pub max_page_size: usize,
    /// Compute independent breakdowns on the rayon pool.
    pub parallel: bool,
    /// Minimum entry count before breakdowns run in parallel.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: 200,
            parallel: true,
            parallel_threshold: 1_000,
        }
    }
}

impl EngineConfig {
    /// A config that always computes sequentially.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if breakdowns over `count` entries should run in parallel.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        self.parallel && count >= self.parallel_threshold
    }

    /// Resolve a requested page size: missing or zero falls back to the
    /// default, larger values are capped.
    #[must_use]
    pub fn page_size_for(&self, requested: Option<usize>) -> usize {
        let default = self.page_size.max(1);
        requested
            .filter(|size| *size > 0)
            .unwrap_or(default)
            .min(self.max_page_size.max(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.page_size, 20);
        assert!(config.parallel);
        assert!(!EngineConfig::sequential().parallel);
    }

    #[test]
    fn should_parallelize_respects_threshold() {
        let config = EngineConfig::default().with_threshold(10);
        assert!(!config.should_parallelize(9));
        assert!(config.should_parallelize(10));
        assert!(!config.with_parallel(false).should_parallelize(1_000_000));
    }

    #[test]
    fn page_size_resolution() {
        let config = EngineConfig::default();
        assert_eq!(config.page_size_for(None), 20);
        assert_eq!(config.page_size_for(Some(0)), 20);
        assert_eq!(config.page_size_for(Some(5)), 5);
        assert_eq!(config.page_size_for(Some(10_000)), 200);
    }
}
