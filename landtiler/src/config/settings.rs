//! Configuration structs and their defaults.

use std::time::Duration;

use crate::assembler::AssemblyConfig;
use crate::error::GridError;
use crate::policy::{
    FailurePolicy, RetryPolicy, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_INITIAL_DELAY_MS,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_SECS,
};
use crate::provider::{DEFAULT_BAND, DEFAULT_TIMEOUT_SECS};
use crate::raster::ClassCode;
use crate::region::RegionPresets;
use crate::tiler::{TileCount, DEFAULT_MAX_PIXELS_PER_REQUEST};

/// Default ground resolution in meters per pixel.
pub const DEFAULT_RESOLUTION_METERS: f64 = 5000.0;

/// Default class code for cells without data.
pub const DEFAULT_CLASS_VALUE: ClassCode = 0;

/// Default delay after the first failed attempt, in milliseconds.
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = DEFAULT_INITIAL_DELAY_MS;

/// Default cap on the retry delay, in milliseconds.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = DEFAULT_MAX_DELAY_SECS * 1000;

/// Maximum number of concurrent tile fetches accepted from configuration.
pub const MAX_CONCURRENCY: usize = 64;

/// `[source]` section: where tiles come from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// Endpoint URL template
    pub url: Option<String>,
    pub band: String,
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            url: None,
            band: DEFAULT_BAND.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[grid]` section: raster geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    /// Meters per pixel
    pub resolution: f64,
    pub tiles_x: usize,
    pub tiles_y: usize,
    pub default_value: ClassCode,
    pub max_pixels_per_request: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        let tiles = TileCount::default();
        Self {
            resolution: DEFAULT_RESOLUTION_METERS,
            tiles_x: tiles.x,
            tiles_y: tiles.y,
            default_value: DEFAULT_CLASS_VALUE,
            max_pixels_per_request: DEFAULT_MAX_PIXELS_PER_REQUEST,
        }
    }
}

/// `[download]` section: retry and scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub concurrency: usize,
    pub on_failure: FailurePolicy,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            concurrency: 1,
            on_failure: FailurePolicy::Abort,
        }
    }
}

/// Complete contents of `config.ini`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub source: SourceSettings,
    pub grid: GridSettings,
    pub download: DownloadSettings,
    /// `[regions]` entries in file order
    pub regions: Vec<(String, [f64; 4])>,
}

impl ConfigFile {
    /// Retry policy described by the `[download]` section.
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.download.max_attempts <= 1 {
            return RetryPolicy::None;
        }
        RetryPolicy::ExponentialBackoff {
            max_attempts: self.download.max_attempts,
            initial_delay: Duration::from_millis(self.download.initial_backoff_ms),
            max_delay: Duration::from_millis(self.download.max_backoff_ms),
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }

    /// Built-in presets plus the `[regions]` entries, which win on name
    /// clashes.
    pub fn presets(&self) -> Result<RegionPresets, GridError> {
        let mut presets = RegionPresets::builtin();
        for (name, bounds) in &self.regions {
            presets.insert(name.clone(), *bounds)?;
        }
        Ok(presets)
    }

    /// Tile count from the `[grid]` section.
    pub fn tile_count(&self) -> Result<TileCount, GridError> {
        TileCount::new(self.grid.tiles_x, self.grid.tiles_y)
    }

    /// Assembly settings described by this file.
    pub fn assembly_config(&self) -> Result<AssemblyConfig, GridError> {
        Ok(AssemblyConfig::default()
            .with_tiles(self.tile_count()?)
            .with_default_value(self.grid.default_value)
            .with_failure_policy(self.download.on_failure)
            .with_retry_policy(self.retry_policy())
            .with_concurrency(self.download.concurrency))
    }
}
