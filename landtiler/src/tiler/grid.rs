//! Tile and grid types.

use std::fmt;

use crate::error::GridError;
use crate::region::Region;
use crate::resolution::ResolutionModel;

/// One cell of a [`TileGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Position in the grid's sequence
    index: usize,
    /// X index, 0 at the western edge
    x: usize,
    /// Y index, 0 at the southern edge
    y: usize,
    region: Region,
}

impl Tile {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn region(&self) -> &Region {
        &self.region
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tile #{} (x={}, y={}) {}",
            self.index, self.x, self.y, self.region
        )
    }
}

/// Ordered set of tiles that partition a parent region.
#[derive(Debug, Clone)]
pub struct TileGrid {
    parent: Region,
    tiles_x: usize,
    tiles_y: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn parent(&self) -> &Region {
        &self.parent
    }

    pub fn tiles_x(&self) -> usize {
        self.tiles_x
    }

    pub fn tiles_y(&self) -> usize {
        self.tiles_y
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Checks that every tile covers at least one pixel on both axes at
    /// the resolution of `model`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyTile`] for the first tile whose pixel
    /// dimensions round to zero.
    pub fn check_footprint(&self, model: &ResolutionModel) -> Result<(), GridError> {
        for tile in &self.tiles {
            let dims = model.pixel_dimensions(tile.region());
            if dims.is_empty() {
                return Err(GridError::EmptyTile {
                    tiles_x: self.tiles_x,
                    tiles_y: self.tiles_y,
                    index: tile.index,
                    width: dims.width,
                    height: dims.height,
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TileGrid {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

/// Splits `region` into `tiles_x × tiles_y` equal tiles.
///
/// Edges are computed by linear interpolation between the parent bounds
/// rather than by repeatedly adding the tile size, and the last edge on each
/// axis is pinned to the parent's maximum. Shared edges between neighbours
/// are bit-identical, so the tiles cover the parent with no gaps or overlaps.
///
/// # Errors
///
/// Returns [`GridError::InvalidTileCount`] if either count is zero.
pub fn subdivide(region: &Region, tiles_x: usize, tiles_y: usize) -> Result<TileGrid, GridError> {
    if tiles_x == 0 || tiles_y == 0 {
        return Err(GridError::InvalidTileCount { tiles_x, tiles_y });
    }

    let lon_edges = edges(region.lon_min(), region.lon_max(), tiles_x);
    let lat_edges = edges(region.lat_min(), region.lat_max(), tiles_y);

    let mut tiles = Vec::with_capacity(tiles_x * tiles_y);
    for x in 0..tiles_x {
        for y in 0..tiles_y {
            let (lon_min, lon_max) = (lon_edges[x], lon_edges[x + 1]);
            let (lat_min, lat_max) = (lat_edges[y], lat_edges[y + 1]);
            if lon_min >= lon_max || lat_min >= lat_max {
                return Err(GridError::InvalidRegion(format!(
                    "region {} is too small for a {}x{} tile grid",
                    region, tiles_x, tiles_y
                )));
            }
            tiles.push(Tile {
                index: tiles.len(),
                x,
                y,
                region: Region::from_edges(lon_min, lat_min, lon_max, lat_max),
            });
        }
    }

    Ok(TileGrid {
        parent: *region,
        tiles_x,
        tiles_y,
        tiles,
    })
}

/// `count + 1` boundaries from `min` to `max`, both ends exact.
fn edges(min: f64, max: f64, count: usize) -> Vec<f64> {
    let span = max - min;
    (0..=count)
        .map(|k| {
            if k == count {
                max
            } else {
                min + span * (k as f64 / count as f64)
            }
        })
        .collect()
}
