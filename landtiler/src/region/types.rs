//! Region type definitions

use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Axis-aligned geographic rectangle in degrees.
///
/// Bounds are ordered `(lon_min, lat_min, lon_max, lat_max)`. A `Region` can
/// only be obtained through [`Region::new`] (or parsing), so every value in
/// circulation satisfies `lon_min < lon_max` and `lat_min < lat_max`.
///
/// # Example
///
/// ```
/// use landtiler::region::Region;
///
/// let berlin = Region::new(13.0, 52.3, 13.7, 52.7).unwrap();
/// assert!((berlin.width_degrees() - 0.7).abs() < 1e-9);
///
/// // Inverted latitudes are rejected instead of silently swapped
/// assert!(Region::new(-180.0, 180.0, -90.0, 90.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    lon_min: f64,
    lat_min: f64,
    lon_max: f64,
    lat_max: f64,
}

impl Region {
    /// Creates a region after validating its bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRegion`] if any bound is not finite, lies
    /// outside the WGS84 range, or if a minimum is not strictly below its
    /// maximum.
    pub fn new(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Result<Self, GridError> {
        let bounds = [lon_min, lat_min, lon_max, lat_max];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(GridError::InvalidRegion(format!(
                "bounds must be finite numbers, got {:?}",
                bounds
            )));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon_min) || !(MIN_LON..=MAX_LON).contains(&lon_max) {
            return Err(GridError::InvalidRegion(format!(
                "longitude must be within [{}, {}], got {} .. {}",
                MIN_LON, MAX_LON, lon_min, lon_max
            )));
        }
        if !(MIN_LAT..=MAX_LAT).contains(&lat_min) || !(MIN_LAT..=MAX_LAT).contains(&lat_max) {
            return Err(GridError::InvalidRegion(format!(
                "latitude must be within [{}, {}], got {} .. {}",
                MIN_LAT, MAX_LAT, lat_min, lat_max
            )));
        }
        if lon_min >= lon_max {
            return Err(GridError::InvalidRegion(format!(
                "lon_min ({}) must be less than lon_max ({})",
                lon_min, lon_max
            )));
        }
        if lat_min >= lat_max {
            return Err(GridError::InvalidRegion(format!(
                "lat_min ({}) must be less than lat_max ({})",
                lat_min, lat_max
            )));
        }

        Ok(Self {
            lon_min,
            lat_min,
            lon_max,
            lat_max,
        })
    }

    /// Creates a region from a `[lon_min, lat_min, lon_max, lat_max]` array.
    pub fn from_bounds(bounds: [f64; 4]) -> Result<Self, GridError> {
        Self::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }

    /// Builds a sub-rectangle whose edges were derived from an already
    /// validated parent. Ordering of the edges is the caller's invariant.
    pub(crate) fn from_edges(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Self {
        debug_assert!(lon_min < lon_max && lat_min < lat_max);
        Self {
            lon_min,
            lat_min,
            lon_max,
            lat_max,
        }
    }

    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lon_max(&self) -> f64 {
        self.lon_max
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    /// Bounds as `[lon_min, lat_min, lon_max, lat_max]`.
    pub fn bounds(&self) -> [f64; 4] {
        [self.lon_min, self.lat_min, self.lon_max, self.lat_max]
    }

    /// East-west extent in degrees.
    #[inline]
    pub fn width_degrees(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// North-south extent in degrees.
    #[inline]
    pub fn height_degrees(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Area of the intersection with `other`, in square degrees.
    ///
    /// Rectangles that only share an edge have zero overlap.
    pub fn overlap_area(&self, other: &Region) -> f64 {
        let w = self.lon_max.min(other.lon_max) - self.lon_min.max(other.lon_min);
        let h = self.lat_max.min(other.lat_max) - self.lat_min.max(other.lat_min);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.lon_min, self.lat_min, self.lon_max, self.lat_max
        )
    }
}

/// Parses `"lon_min,lat_min,lon_max,lat_max"` (whitespace around values is
/// ignored).
impl FromStr for Region {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GridError::InvalidRegion(format!("cannot parse '{}': {}", s, e)))?;

        match values.as_slice() {
            [lon_min, lat_min, lon_max, lat_max] => {
                Self::new(*lon_min, *lat_min, *lon_max, *lat_max)
            }
            _ => Err(GridError::InvalidRegion(format!(
                "expected 4 comma-separated values (lon_min,lat_min,lon_max,lat_max), got {}",
                values.len()
            ))),
        }
    }
}
