//! LandTiler - tiled fetching and assembly of land-cover rasters
//!
//! Remote classification services cap the number of pixels a single request
//! may return. This library splits a large rectangular region into a grid of
//! tiles that each fit under that cap, fetches every tile, and places the
//! results into one seamless raster at a caller-chosen ground resolution.
//!
//! # Architecture
//!
//! - [`region`]: validated bounding boxes and named presets
//! - [`resolution`]: meters-per-pixel to degrees-per-pixel conversion
//! - [`tiler`]: subdivision of a region into an ordered tile grid
//! - [`raster`]: the global output buffer and per-tile payloads
//! - [`provider`]: the [`provider::TileFetcher`] capability and an HTTP backend
//! - [`policy`]: retry and failure handling knobs
//! - [`assembler`]: offset computation, clipping and placement of tiles
//! - [`export`]: CSV persistence and colour-mapped PNG rendering
//! - [`config`]: INI configuration file
//! - [`logging`]: `tracing` subscriber setup
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use landtiler::assembler::{AssemblyConfig, RasterAssembler};
//! use landtiler::provider::{GridEndpointProvider, ReqwestClient};
//! use landtiler::region::RegionPresets;
//! use landtiler::resolution::ResolutionModel;
//!
//! let region = RegionPresets::builtin().resolve("Berlin")?;
//! let model = ResolutionModel::from_meters(500.0)?;
//! let provider = GridEndpointProvider::new(ReqwestClient::new()?, "https://example.org/sample");
//! let assembler = RasterAssembler::new(Arc::new(provider), AssemblyConfig::default());
//! let assembled = assembler.assemble(&region, &model)?;
//! println!("{}x{}", assembled.raster().width(), assembled.raster().height());
//! ```

pub mod assembler;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod policy;
pub mod provider;
pub mod raster;
pub mod region;
pub mod resolution;
pub mod tiler;

pub use error::GridError;

/// Cooperative cancellation handle shared between the caller and an assembly.
pub use tokio_util::sync::CancellationToken;
