//! Assembly configuration.

use crate::policy::{FailurePolicy, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::raster::ClassCode;
use crate::tiler::TileCount;

/// Knobs controlling one assembly run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    /// Tile grid shape
    pub tiles: TileCount,
    /// Initial raster value and substitute for out-of-coverage tiles
    pub default_value: ClassCode,
    pub failure_policy: FailurePolicy,
    pub retry_policy: RetryPolicy,
    /// Number of concurrent fetch workers; 1 fetches sequentially
    pub concurrency: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            tiles: TileCount::default(),
            default_value: 0,
            failure_policy: FailurePolicy::Abort,
            retry_policy: RetryPolicy::exponential(DEFAULT_MAX_ATTEMPTS),
            concurrency: 1,
        }
    }
}

impl AssemblyConfig {
    pub fn with_tiles(mut self, tiles: TileCount) -> Self {
        self.tiles = tiles;
        self
    }

    pub fn with_default_value(mut self, value: ClassCode) -> Self {
        self.default_value = value;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}
