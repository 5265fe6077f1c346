//! Configuration-level errors.
//!
//! These are raised while the grid geometry is being set up and always abort
//! an assembly before the first tile is fetched.

use thiserror::Error;

/// Errors raised by region, resolution and tiler setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Region bounds are malformed, inverted or degenerate.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// Ground resolution is not a positive, finite number.
    #[error("Invalid resolution: {0} (must be a positive number)")]
    InvalidResolution(f64),

    /// Named preset does not exist.
    #[error("Region '{name}' not found. Available regions: {}", available.join(", "))]
    UnknownRegion {
        name: String,
        available: Vec<String>,
    },

    /// Tile grid must have at least one tile along each axis.
    #[error("Invalid tile count: {tiles_x}x{tiles_y} (both must be at least 1)")]
    InvalidTileCount { tiles_x: usize, tiles_y: usize },

    /// A tile of the grid spans less than one pixel along an axis.
    #[error(
        "Tile grid {tiles_x}x{tiles_y} is too fine for this resolution: tile #{index} is {width}x{height} pixels"
    )]
    EmptyTile {
        tiles_x: usize,
        tiles_y: usize,
        index: usize,
        width: usize,
        height: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_region_lists_names() {
        let err = GridError::UnknownRegion {
            name: "Atlantis".to_string(),
            available: vec!["Berlin".to_string(), "Sahara".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Atlantis"));
        assert!(msg.contains("Berlin, Sahara"));
    }

    #[test]
    fn test_invalid_resolution_display() {
        let err = GridError::InvalidResolution(-5.0);
        assert!(err.to_string().contains("-5"));
    }

    #[test]
    fn test_invalid_tile_count_display() {
        let err = GridError::InvalidTileCount {
            tiles_x: 0,
            tiles_y: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid tile count: 0x3 (both must be at least 1)"
        );
    }
}
