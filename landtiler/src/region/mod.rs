//! Geographic regions
//!
//! Provides the validated [`Region`] bounding box used everywhere in the
//! library, plus the [`RegionPresets`] table that maps friendly names such as
//! `"Berlin"` to bounds.

mod presets;
mod types;

pub use presets::{RegionPresets, RegionSelector};
pub use types::{Region, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
