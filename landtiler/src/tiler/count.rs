//! Tile count selection.

use std::fmt;

use crate::error::GridError;
use crate::region::Region;
use crate::resolution::{PixelDimensions, ResolutionModel};

/// Default per-request pixel budget (512 × 512).
pub const DEFAULT_MAX_PIXELS_PER_REQUEST: usize = 262_144;

/// Number of tiles along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCount {
    pub x: usize,
    pub y: usize,
}

impl TileCount {
    /// Creates a tile count, rejecting zero along either axis.
    pub fn new(x: usize, y: usize) -> Result<Self, GridError> {
        if x == 0 || y == 0 {
            return Err(GridError::InvalidTileCount {
                tiles_x: x,
                tiles_y: y,
            });
        }
        Ok(Self { x, y })
    }

    /// Total number of tiles.
    pub fn total(&self) -> usize {
        self.x * self.y
    }

    /// Pixel footprint of one tile of `region` at this count.
    ///
    /// Uses the same rounding as the assembler, applied to the tile's own
    /// extent.
    pub fn tile_dimensions(&self, region: &Region, model: &ResolutionModel) -> PixelDimensions {
        model.extent_dimensions(
            region.width_degrees() / self.x as f64,
            region.height_degrees() / self.y as f64,
        )
    }

    /// Picks the smallest grid whose tiles each stay within `max_pixels`.
    ///
    /// Starts from a single tile and repeatedly splits the axis whose tiles
    /// are currently longer, so tiles stay roughly square.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidTileCount`] if `max_pixels` is zero.
    pub fn for_pixel_limit(
        region: &Region,
        model: &ResolutionModel,
        max_pixels: usize,
    ) -> Result<Self, GridError> {
        if max_pixels == 0 {
            return Err(GridError::InvalidTileCount {
                tiles_x: 0,
                tiles_y: 0,
            });
        }

        let mut count = Self { x: 1, y: 1 };
        loop {
            let dims = count.tile_dimensions(region, model);
            if dims.pixel_count() <= max_pixels {
                return Ok(count);
            }
            if dims.width >= dims.height {
                count.x += 1;
            } else {
                count.y += 1;
            }
        }
    }
}

impl Default for TileCount {
    fn default() -> Self {
        // Reference grid used for continent-sized regions
        Self { x: 20, y: 10 }
    }
}

impl fmt::Display for TileCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert!(TileCount::new(0, 1).is_err());
        assert!(TileCount::new(1, 0).is_err());
        assert_eq!(TileCount::new(3, 2).unwrap().total(), 6);
    }

    #[test]
    fn test_default() {
        let count = TileCount::default();
        assert_eq!((count.x, count.y), (20, 10));
        assert_eq!(count.to_string(), "20x10");
    }

    #[test]
    fn test_tile_dimensions_agree_with_subdivided_tiles() {
        // 4.6 x 2.5 px split 2x2: each tile is 2.3 x 1.25 px
        let region = Region::new(0.0, 0.0, 4.6, 2.5).unwrap();
        let model = ResolutionModel::from_step_degrees(1.0).unwrap();
        let count = TileCount::new(2, 2).unwrap();
        let grid = crate::tiler::subdivide(&region, 2, 2).unwrap();

        let dims = count.tile_dimensions(&region, &model);
        assert_eq!(dims, PixelDimensions::new(2, 1));
        for tile in &grid {
            assert_eq!(model.pixel_dimensions(tile.region()), dims);
        }
    }

    #[test]
    fn test_small_region_needs_one_tile() {
        let region = Region::new(0.0, 0.0, 2.0, 2.0).unwrap();
        let model = ResolutionModel::from_step_degrees(1.0).unwrap();
        let count = TileCount::for_pixel_limit(&region, &model, 4).unwrap();
        assert_eq!(count, TileCount { x: 1, y: 1 });
    }

    #[test]
    fn test_splits_longer_axis_first() {
        // 8x2 pixels, limit 4 -> tiles of 2x2 need 4 columns
        let region = Region::new(0.0, 0.0, 8.0, 2.0).unwrap();
        let model = ResolutionModel::from_step_degrees(1.0).unwrap();
        let count = TileCount::for_pixel_limit(&region, &model, 4).unwrap();
        assert_eq!(count, TileCount { x: 4, y: 1 });
    }

    #[test]
    fn test_tiles_respect_limit_for_world_at_5km() {
        let region = Region::new(-180.0, -90.0, 180.0, 90.0).unwrap();
        let model = ResolutionModel::from_meters(5000.0).unwrap();
        let count =
            TileCount::for_pixel_limit(&region, &model, DEFAULT_MAX_PIXELS_PER_REQUEST).unwrap();

        let dims = count.tile_dimensions(&region, &model);
        assert!(dims.pixel_count() <= DEFAULT_MAX_PIXELS_PER_REQUEST);
        // 8015x4008 pixels cannot fit in a single request
        assert!(count.total() > 1);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let region = Region::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let model = ResolutionModel::from_step_degrees(0.1).unwrap();
        assert!(TileCount::for_pixel_limit(&region, &model, 0).is_err());
    }
}
