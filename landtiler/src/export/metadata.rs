//! JSON sidecar describing where an exported raster sits on the globe.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ExportError;
use crate::assembler::AssembledRaster;
use crate::raster::ClassCode;

/// Geometry and outcome of an assembly, stored next to the CSV grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterMetadata {
    /// `[lon_min, lat_min, lon_max, lat_max]`
    pub bounds: [f64; 4],
    /// Degrees per pixel on both axes
    pub step_degrees: f64,
    pub width: usize,
    pub height: usize,
    pub default_value: ClassCode,
    pub tiles_total: usize,
    pub tiles_placed: usize,
    pub tiles_substituted: usize,
    /// Sequence indices of tiles left at the default value
    pub failed_tiles: Vec<usize>,
}

impl RasterMetadata {
    pub fn from_assembled(assembled: &AssembledRaster, default_value: ClassCode) -> Self {
        let report = assembled.report();
        let dims = assembled.dimensions();
        Self {
            bounds: assembled.region().bounds(),
            step_degrees: assembled.step_degrees(),
            width: dims.width,
            height: dims.height,
            default_value,
            tiles_total: report.tiles_total,
            tiles_placed: report.tiles_placed,
            tiles_substituted: report.tiles_substituted,
            failed_tiles: report.failures.iter().map(|f| f.index).collect(),
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.failed_tiles.is_empty()
    }

    /// Load metadata from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Save metadata as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{AssemblyReport, TileFailure};
    use crate::provider::FetchError;
    use crate::raster::RasterBuffer;
    use crate::region::Region;
    use crate::resolution::PixelDimensions;

    fn assembled() -> AssembledRaster {
        let region = Region::new(10.0, 50.0, 12.0, 51.0).unwrap();
        let mut report = AssemblyReport::new(2);
        report.tiles_placed = 1;
        report.failures.push(TileFailure {
            index: 1,
            bounds: Region::new(11.0, 50.0, 12.0, 51.0).unwrap(),
            attempts: 3,
            error: FetchError::Http("HTTP 503".into()),
        });
        AssembledRaster::new(
            RasterBuffer::new(PixelDimensions::new(4, 2), -1),
            region,
            0.5,
            report,
        )
    }

    #[test]
    fn test_from_assembled() {
        let meta = RasterMetadata::from_assembled(&assembled(), -1);
        assert_eq!(meta.bounds, [10.0, 50.0, 12.0, 51.0]);
        assert_eq!((meta.width, meta.height), (4, 2));
        assert_eq!(meta.failed_tiles, vec![1]);
        assert!(meta.is_partial());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("grid.json");
        let meta = RasterMetadata::from_assembled(&assembled(), -1);

        meta.save(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"step_degrees\": 0.5"));
        assert_eq!(RasterMetadata::load(&path).unwrap(), meta);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            RasterMetadata::load(&path),
            Err(ExportError::Json(_))
        ));
    }
}
