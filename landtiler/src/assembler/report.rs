//! Assembly results and progress.

use std::fmt;

use crate::provider::FetchError;
use crate::raster::RasterBuffer;
use crate::region::Region;
use crate::resolution::PixelDimensions;

/// A tile that was skipped under [`FailurePolicy::SkipTile`].
///
/// [`FailurePolicy::SkipTile`]: crate::policy::FailurePolicy::SkipTile
#[derive(Debug, Clone, PartialEq)]
pub struct TileFailure {
    pub index: usize,
    pub bounds: Region,
    pub attempts: u32,
    pub error: FetchError,
}

impl fmt::Display for TileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tile #{} {} after {} attempt(s): {}",
            self.index, self.bounds, self.attempts, self.error
        )
    }
}

/// Per-assembly accounting.
///
/// Every tile ends up in exactly one of the placed, outside, substituted or
/// failed buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblyReport {
    pub tiles_total: usize,
    /// Tiles whose fetched data was written into the raster
    pub tiles_placed: usize,
    /// Tiles whose window fell entirely outside the raster
    pub tiles_outside: usize,
    /// Out-of-coverage tiles replaced by a default-filled block
    pub tiles_substituted: usize,
    /// Tiles skipped after exhausting their retries
    pub failures: Vec<TileFailure>,
    /// Extra attempts made across all tiles
    pub retries: u32,
}

impl AssemblyReport {
    pub fn new(tiles_total: usize) -> Self {
        Self {
            tiles_total,
            ..Self::default()
        }
    }

    /// Tiles handled so far.
    pub fn tiles_completed(&self) -> usize {
        self.tiles_placed + self.tiles_outside + self.tiles_substituted + self.failures.len()
    }

    /// True if any tile's window was left at the default value because its
    /// fetch failed.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl fmt::Display for AssemblyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} tiles placed, {} outside, {} substituted, {} failed, {} retries",
            self.tiles_placed,
            self.tiles_total,
            self.tiles_outside,
            self.tiles_substituted,
            self.failures.len(),
            self.retries
        )
    }
}

/// Progress snapshot passed to the progress callback after each tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyProgress {
    pub completed: usize,
    pub total: usize,
    /// Sequence index of the tile that just completed
    pub tile_index: usize,
}

impl AssemblyProgress {
    /// Completion fraction (0.0 - 1.0).
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Progress callback invoked from the thread that owns the raster.
pub type ProgressCallback = Box<dyn Fn(AssemblyProgress) + Send + Sync>;

/// A finished raster with the geometry needed to interpret it.
#[derive(Debug, Clone)]
pub struct AssembledRaster {
    raster: RasterBuffer,
    region: Region,
    step_degrees: f64,
    report: AssemblyReport,
}

impl AssembledRaster {
    pub fn new(
        raster: RasterBuffer,
        region: Region,
        step_degrees: f64,
        report: AssemblyReport,
    ) -> Self {
        Self {
            raster,
            region,
            step_degrees,
            report,
        }
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn into_raster(self) -> RasterBuffer {
        self.raster
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn step_degrees(&self) -> f64 {
        self.step_degrees
    }

    pub fn dimensions(&self) -> PixelDimensions {
        self.raster.dimensions()
    }

    pub fn report(&self) -> &AssemblyReport {
        &self.report
    }

    pub fn is_partial(&self) -> bool {
        self.report.is_partial()
    }

    /// Longitude and latitude of the centre of pixel `(row, col)`.
    ///
    /// Returns `None` outside the raster.
    pub fn pixel_to_lon_lat(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        if row >= self.raster.height() || col >= self.raster.width() {
            return None;
        }
        let lon = self.region.lon_min() + (col as f64 + 0.5) * self.step_degrees;
        let lat = self.region.lat_max() - (row as f64 + 0.5) * self.step_degrees;
        Some((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembled(report: AssemblyReport) -> AssembledRaster {
        AssembledRaster::new(
            RasterBuffer::new(PixelDimensions::new(4, 2), 0),
            Region::new(10.0, 50.0, 14.0, 52.0).unwrap(),
            1.0,
            report,
        )
    }

    #[test]
    fn test_pixel_centres() {
        let raster = assembled(AssemblyReport::new(1));
        assert_eq!(raster.pixel_to_lon_lat(0, 0), Some((10.5, 51.5)));
        assert_eq!(raster.pixel_to_lon_lat(1, 3), Some((13.5, 50.5)));
        assert_eq!(raster.pixel_to_lon_lat(2, 0), None);
        assert_eq!(raster.pixel_to_lon_lat(0, 4), None);
    }

    #[test]
    fn test_report_partial() {
        let mut report = AssemblyReport::new(2);
        report.tiles_placed = 1;
        assert!(!report.is_partial());

        report.failures.push(TileFailure {
            index: 1,
            bounds: Region::new(0.0, 0.0, 1.0, 1.0).unwrap(),
            attempts: 3,
            error: FetchError::Http("HTTP 500".into()),
        });
        assert!(report.is_partial());
        assert_eq!(report.tiles_completed(), 2);
        assert!(assembled(report).is_partial());
    }

    #[test]
    fn test_report_display() {
        let report = AssemblyReport {
            tiles_total: 4,
            tiles_placed: 3,
            tiles_outside: 0,
            tiles_substituted: 1,
            failures: Vec::new(),
            retries: 2,
        };
        assert_eq!(
            report.to_string(),
            "3/4 tiles placed, 0 outside, 1 substituted, 0 failed, 2 retries"
        );
    }

    #[test]
    fn test_progress_fraction() {
        let progress = AssemblyProgress {
            completed: 1,
            total: 4,
            tile_index: 0,
        };
        assert_eq!(progress.fraction(), 0.25);
    }
}
