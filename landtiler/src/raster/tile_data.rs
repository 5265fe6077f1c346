//! Per-tile fetch payload.

use super::ClassCode;
use crate::resolution::PixelDimensions;

/// 2-D array of class codes returned for a single tile.
///
/// Services do not always return exactly the expected shape, so a
/// `TileData` may be larger or smaller than the tile's computed pixel
/// dimensions. The assembler truncates oversized data and tolerates
/// undersized data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileData {
    width: usize,
    height: usize,
    cells: Vec<ClassCode>,
}

impl TileData {
    /// Builds tile data from rows of class codes.
    ///
    /// Ragged input is trimmed to the shortest row so the result is always
    /// rectangular.
    pub fn from_rows(rows: Vec<Vec<ClassCode>>) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).min().unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            cells.extend_from_slice(&row[..width]);
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Tile data of the given shape with every cell set to `value`.
    pub fn filled(dims: PixelDimensions, value: ClassCode) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            cells: vec![value; dims.pixel_count()],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> PixelDimensions {
        PixelDimensions::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Cells of row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    pub fn row(&self, row: usize) -> &[ClassCode] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<ClassCode> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Drops rows and columns beyond `limit`. Never pads.
    pub fn truncated(self, limit: PixelDimensions) -> Self {
        if self.width <= limit.width && self.height <= limit.height {
            return self;
        }

        let width = self.width.min(limit.width);
        let height = self.height.min(limit.height);
        let mut cells = Vec::with_capacity(width * height);
        for r in 0..height {
            cells.extend_from_slice(&self.row(r)[..width]);
        }
        Self {
            width,
            height,
            cells,
        }
    }
}
