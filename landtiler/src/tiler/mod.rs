//! Tile grid subdivision
//!
//! Splits a parent [`Region`](crate::region::Region) into `tiles_x × tiles_y`
//! equal cells. Each cell is small enough that a single fetch stays under
//! the remote service's per-request pixel limit.
//!
//! # Ordering
//!
//! Tiles are produced column by column: for each x index (west to east),
//! every y index (south to north). A tile's sequence index is therefore
//! `x * tiles_y + y`. This order is stable and is what progress reports
//! and failure messages refer to.
//!
//! ```text
//!   lat_max ┌─────┬─────┬─────┐
//!           │  2  │  5  │  8  │
//!           ├─────┼─────┼─────┤
//!           │  1  │  4  │  7  │
//!           ├─────┼─────┼─────┤
//!           │  0  │  3  │  6  │
//!   lat_min └─────┴─────┴─────┘
//!        lon_min           lon_max
//! ```

mod count;
mod grid;

pub use count::{TileCount, DEFAULT_MAX_PIXELS_PER_REQUEST};
pub use grid::{subdivide, Tile, TileGrid};
