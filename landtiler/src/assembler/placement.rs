//! Tile placement arithmetic.

use crate::region::Region;
use crate::resolution::{PixelDimensions, ResolutionModel};

/// Destination window of a tile in the global raster, already clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertWindow {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

/// Computes where a tile's data lands in the global raster.
///
/// Offsets are floored from the tile's north-west corner relative to the
/// parent's north-west corner. The copied block is clipped to both the tile
/// data and the raster. Returns `None` when the tile contributes nothing:
/// either offset is negative, lies at or beyond the raster edge, or the
/// clipped block is empty.
pub fn insert_window(
    parent: &Region,
    tile: &Region,
    model: &ResolutionModel,
    raster: PixelDimensions,
    data: PixelDimensions,
) -> Option<InsertWindow> {
    let row = model.row_offset(parent, tile);
    let col = model.column_offset(parent, tile);
    if row < 0 || col < 0 {
        return None;
    }

    let (row, col) = (row as usize, col as usize);
    if row >= raster.height || col >= raster.width {
        return None;
    }

    let rows = data.height.min(raster.height - row);
    let cols = data.width.min(raster.width - col);
    if rows == 0 || cols == 0 {
        return None;
    }

    Some(InsertWindow {
        row,
        col,
        rows,
        cols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_model() -> ResolutionModel {
        ResolutionModel::from_step_degrees(1.0).unwrap()
    }

    #[test]
    fn test_north_west_tile_lands_at_origin() {
        let parent = Region::new(0.0, 0.0, 2.0, 2.0).unwrap();
        let tile = Region::new(0.0, 1.0, 1.0, 2.0).unwrap();
        let window = insert_window(
            &parent,
            &tile,
            &unit_model(),
            PixelDimensions::new(2, 2),
            PixelDimensions::new(1, 1),
        );
        assert_eq!(
            window,
            Some(InsertWindow {
                row: 0,
                col: 0,
                rows: 1,
                cols: 1
            })
        );
    }

    #[test]
    fn test_south_east_tile() {
        let parent = Region::new(0.0, 0.0, 2.0, 2.0).unwrap();
        let tile = Region::new(1.0, 0.0, 2.0, 1.0).unwrap();
        let window = insert_window(
            &parent,
            &tile,
            &unit_model(),
            PixelDimensions::new(2, 2),
            PixelDimensions::new(1, 1),
        )
        .unwrap();
        assert_eq!((window.row, window.col), (1, 1));
    }

    #[test]
    fn test_clips_at_raster_edge() {
        let parent = Region::new(0.0, 0.0, 3.0, 3.0).unwrap();
        let tile = Region::new(2.0, 0.0, 3.0, 1.0).unwrap();
        let window = insert_window(
            &parent,
            &tile,
            &unit_model(),
            PixelDimensions::new(3, 3),
            PixelDimensions::new(4, 4),
        )
        .unwrap();
        assert_eq!(
            window,
            InsertWindow {
                row: 2,
                col: 2,
                rows: 1,
                cols: 1
            }
        );
    }

    #[test]
    fn test_undersized_data_is_not_padded() {
        let parent = Region::new(0.0, 0.0, 4.0, 4.0).unwrap();
        let tile = Region::new(0.0, 0.0, 4.0, 4.0).unwrap();
        let window = insert_window(
            &parent,
            &tile,
            &unit_model(),
            PixelDimensions::new(4, 4),
            PixelDimensions::new(2, 3),
        )
        .unwrap();
        assert_eq!((window.rows, window.cols), (3, 2));
    }

    #[test]
    fn test_tile_outside_contributes_nothing() {
        let parent = Region::new(0.0, 0.0, 2.0, 2.0).unwrap();
        let dims = PixelDimensions::new(2, 2);
        let data = PixelDimensions::new(1, 1);

        let east = Region::new(5.0, 0.0, 6.0, 1.0).unwrap();
        let west = Region::new(-3.0, 0.0, -2.0, 1.0).unwrap();
        let north = Region::new(0.0, 5.0, 1.0, 6.0).unwrap();
        let south = Region::new(0.0, -6.0, 1.0, -5.0).unwrap();

        for tile in [east, west, north, south] {
            assert_eq!(
                insert_window(&parent, &tile, &unit_model(), dims, data),
                None,
                "{}",
                tile
            );
        }
    }

    #[test]
    fn test_empty_data_contributes_nothing() {
        let parent = Region::new(0.0, 0.0, 2.0, 2.0).unwrap();
        assert_eq!(
            insert_window(
                &parent,
                &parent,
                &unit_model(),
                PixelDimensions::new(2, 2),
                PixelDimensions::new(0, 2),
            ),
            None
        );
    }
}
