//! Raster storage
//!
//! [`RasterBuffer`] is the global output grid of class codes. [`TileData`] is
//! the transient payload returned by a fetcher for one tile. Both are stored
//! row-major with row 0 at the northern edge and column 0 at the western
//! edge.

mod buffer;
mod tile_data;

pub use buffer::RasterBuffer;
pub use tile_data::TileData;

/// Integer label identifying a land-cover category.
pub type ClassCode = i32;
