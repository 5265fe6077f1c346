//! Global raster buffer.

use super::{ClassCode, TileData};
use crate::resolution::PixelDimensions;

/// Row-major grid of class codes covering a whole region.
///
/// `[0, 0]` is the north-west corner. Rows increase southward and columns
/// increase eastward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    cells: Vec<ClassCode>,
}

impl RasterBuffer {
    /// Allocates a raster with every cell set to `fill`.
    pub fn new(dims: PixelDimensions, fill: ClassCode) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            cells: vec![fill; dims.pixel_count()],
        }
    }

    /// Wraps existing row-major cells.
    ///
    /// Returns `None` if `cells.len()` is not `width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<ClassCode>) -> Option<Self> {
        if width.checked_mul(height)? != cells.len() {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
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

    /// All cells in row-major order.
    pub fn cells(&self) -> &[ClassCode] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<ClassCode> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
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

    /// Iterates rows from north to south.
    pub fn rows(&self) -> impl Iterator<Item = &[ClassCode]> + '_ {
        (0..self.height).map(move |r| self.row(r))
    }

    /// Number of cells equal to `value`.
    pub fn count(&self, value: ClassCode) -> usize {
        self.cells.iter().filter(|&&c| c == value).count()
    }

    /// Copies the top-left `rows × cols` block of `tile` so that its first
    /// cell lands at `(row_start, col_start)`.
    ///
    /// The caller has already clipped the window; this only asserts it in
    /// debug builds.
    pub(crate) fn copy_window(
        &mut self,
        tile: &TileData,
        row_start: usize,
        col_start: usize,
        rows: usize,
        cols: usize,
    ) {
        debug_assert!(row_start + rows <= self.height && col_start + cols <= self.width);
        debug_assert!(rows <= tile.height() && cols <= tile.width());

        for r in 0..rows {
            let dst = (row_start + r) * self.width + col_start;
            self.cells[dst..dst + cols].copy_from_slice(&tile.row(r)[..cols]);
        }
    }
}
