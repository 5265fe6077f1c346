//! Export errors.

use thiserror::Error;

/// Errors raised while persisting or rendering a raster.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Metadata error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV row does not have the same number of values as the first row
    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A CSV value is not an integer class code
    #[error("Row {row}, column {col}: '{value}' is not an integer class code")]
    Parse {
        row: usize,
        col: usize,
        value: String,
    },

    /// Raster has tiles that failed to fetch and the caller did not opt in
    #[error("Raster is partial ({failed} tile(s) failed); allow partial output to export it anyway")]
    PartialRaster { failed: usize },

    #[error("Raster of {width}x{height} pixels cannot be rendered")]
    UnrenderableSize { width: usize, height: usize },
}
