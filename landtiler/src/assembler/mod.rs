//! Raster assembly
//!
//! Turns a region, a resolution and a [`TileFetcher`](crate::provider::TileFetcher)
//! into one seamless raster.
//!
//! For every tile, in sequence order:
//!
//! 1. The expected pixel size is derived from the tile's own extent.
//! 2. The fetcher is called, retrying transient errors per the
//!    [`RetryPolicy`](crate::policy::RetryPolicy).
//! 3. Oversized results are truncated to the expected size. Undersized
//!    results are used as they are.
//! 4. The tile's row and column offsets are floored from its north-west
//!    corner relative to the region's north-west corner.
//! 5. The block is clipped to the raster and copied in. A tile that falls
//!    entirely outside the raster writes nothing.

mod config;
mod driver;
mod error;
mod placement;
mod report;

pub use config::AssemblyConfig;
pub use driver::RasterAssembler;
pub use error::AssemblyError;
pub use placement::{insert_window, InsertWindow};
pub use report::{
    AssembledRaster, AssemblyProgress, AssemblyReport, ProgressCallback, TileFailure,
};
