//! Raster export
//!
//! - [`save_csv`] / [`load_csv`]: comma-separated integer grid, one line per
//!   row, no header
//! - [`render_png`]: colour-mapped PNG through a [`ColorMap`]
//! - [`RasterMetadata`]: JSON sidecar with bounds, step and tile outcome
//!
//! The `export_*` helpers take an [`AssembledRaster`] and refuse partial
//! results unless `allow_partial` is set.

mod colormap;
mod csv;
mod error;
mod metadata;
mod png;

use std::path::Path;

use crate::assembler::AssembledRaster;
use crate::raster::RasterBuffer;

pub use self::csv::{load_csv, read_csv, save_csv, write_csv};
pub use colormap::{ColorMap, FALLBACK_COLOR};
pub use error::ExportError;
pub use metadata::RasterMetadata;
pub use png::{render_image, render_png};

/// Returns the raster if it is complete or partial output is allowed.
pub fn checked_raster(
    assembled: &AssembledRaster,
    allow_partial: bool,
) -> Result<&RasterBuffer, ExportError> {
    if assembled.is_partial() && !allow_partial {
        return Err(ExportError::PartialRaster {
            failed: assembled.report().failures.len(),
        });
    }
    Ok(assembled.raster())
}

/// Saves an assembled raster as CSV.
pub fn export_csv(
    assembled: &AssembledRaster,
    path: &Path,
    allow_partial: bool,
) -> Result<(), ExportError> {
    save_csv(checked_raster(assembled, allow_partial)?, path)
}

/// Renders an assembled raster as PNG.
pub fn export_png(
    assembled: &AssembledRaster,
    colormap: &ColorMap,
    path: &Path,
    allow_partial: bool,
) -> Result<(), ExportError> {
    render_png(checked_raster(assembled, allow_partial)?, colormap, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{AssemblyReport, TileFailure};
    use crate::provider::FetchError;
    use crate::region::Region;
    use crate::resolution::PixelDimensions;

    fn partial() -> AssembledRaster {
        let region = Region::new(0.0, 0.0, 2.0, 2.0).unwrap();
        let mut report = AssemblyReport::new(4);
        report.tiles_placed = 3;
        report.failures.push(TileFailure {
            index: 2,
            bounds: Region::new(1.0, 0.0, 2.0, 1.0).unwrap(),
            attempts: 3,
            error: FetchError::Http("HTTP 502".into()),
        });
        AssembledRaster::new(
            RasterBuffer::new(PixelDimensions::new(2, 2), 0),
            region,
            1.0,
            report,
        )
    }

    #[test]
    fn test_partial_raster_refused_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");

        let err = export_csv(&partial(), &path, false).unwrap_err();
        assert!(matches!(err, ExportError::PartialRaster { failed: 1 }));
        assert!(!path.exists());

        let err = export_png(&partial(), &ColorMap::default(), &path, false).unwrap_err();
        assert!(matches!(err, ExportError::PartialRaster { failed: 1 }));
    }

    #[test]
    fn test_partial_raster_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("grid.csv");
        let png_path = dir.path().join("grid.png");

        export_csv(&partial(), &csv_path, true).unwrap();
        export_png(&partial(), &ColorMap::default(), &png_path, true).unwrap();
        assert_eq!(load_csv(&csv_path).unwrap().cells(), &[0, 0, 0, 0]);
        assert!(png_path.exists());
    }
}
