//! Resolution model
//!
//! Converts a ground resolution in meters per pixel into a uniform
//! degrees-per-pixel step and derives pixel dimensions for any region.
//!
//! The conversion uses a fixed meters-per-degree constant measured at the
//! equator. This is an equirectangular approximation, not a projection: one
//! pixel always spans the same number of degrees in both axes.
//!
//! Every pixel dimension in the library, for the global raster, for each
//! tile and for request sizes, goes through [`pixels_for_extent`] so that the
//! same rounding rule (round half away from zero) applies everywhere.

use std::fmt;

use crate::error::GridError;
use crate::region::Region;

/// Approximate length of one degree of arc at the equator, in meters.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Width and height of a raster in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelDimensions {
    pub width: usize,
    pub height: usize,
}

impl PixelDimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// True when either axis has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for PixelDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Converts a ground resolution to a degrees-per-pixel step.
///
/// # Errors
///
/// Returns [`GridError::InvalidResolution`] for zero, negative or
/// non-finite input.
pub fn step_degrees(resolution_meters: f64) -> Result<f64, GridError> {
    if !resolution_meters.is_finite() || resolution_meters <= 0.0 {
        return Err(GridError::InvalidResolution(resolution_meters));
    }
    Ok(resolution_meters / METERS_PER_DEGREE)
}

/// Number of pixels spanning `extent_degrees` at `step_degrees` per pixel,
/// rounded half away from zero.
///
/// Returns zero for extents narrower than half a pixel.
pub fn pixels_for_extent(extent_degrees: f64, step_degrees: f64) -> usize {
    // `as` saturates, and callers pass positive extents and steps
    (extent_degrees / step_degrees).round() as usize
}

/// Uniform sampling grid derived from a ground resolution.
///
/// # Example
///
/// ```
/// use landtiler::region::Region;
/// use landtiler::resolution::ResolutionModel;
///
/// let model = ResolutionModel::from_step_degrees(1.0).unwrap();
/// let region = Region::new(0.0, 0.0, 2.0, 2.0).unwrap();
/// let dims = model.pixel_dimensions(&region);
/// assert_eq!((dims.width, dims.height), (2, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionModel {
    meters_per_pixel: f64,
    step_degrees: f64,
}

impl ResolutionModel {
    /// Creates a model from a ground resolution in meters per pixel.
    pub fn from_meters(meters_per_pixel: f64) -> Result<Self, GridError> {
        let step = step_degrees(meters_per_pixel)?;
        Ok(Self {
            meters_per_pixel,
            step_degrees: step,
        })
    }

    /// Creates a model directly from a degrees-per-pixel step.
    pub fn from_step_degrees(step_degrees: f64) -> Result<Self, GridError> {
        if !step_degrees.is_finite() || step_degrees <= 0.0 {
            return Err(GridError::InvalidResolution(step_degrees));
        }
        Ok(Self {
            meters_per_pixel: step_degrees * METERS_PER_DEGREE,
            step_degrees,
        })
    }

    pub fn meters_per_pixel(&self) -> f64 {
        self.meters_per_pixel
    }

    /// Angular width and height of one pixel.
    #[inline]
    pub fn step_degrees(&self) -> f64 {
        self.step_degrees
    }

    /// Pixel dimensions of `region`, each axis rounded to the nearest integer.
    ///
    /// This is a pure function and may return zero along an axis when the
    /// region is narrower than half a pixel.
    pub fn pixel_dimensions(&self, region: &Region) -> PixelDimensions {
        self.extent_dimensions(region.width_degrees(), region.height_degrees())
    }

    /// Pixel dimensions of a `width_degrees` by `height_degrees` rectangle.
    pub fn extent_dimensions(&self, width_degrees: f64, height_degrees: f64) -> PixelDimensions {
        PixelDimensions {
            width: pixels_for_extent(width_degrees, self.step_degrees),
            height: pixels_for_extent(height_degrees, self.step_degrees),
        }
    }

    /// Pixel dimensions for a raster that must hold at least one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRegion`] if the region rounds to zero
    /// pixels along either axis at this resolution.
    pub fn raster_dimensions(&self, region: &Region) -> Result<PixelDimensions, GridError> {
        let dims = self.pixel_dimensions(region);
        if dims.is_empty() {
            return Err(GridError::InvalidRegion(format!(
                "region {} is {} pixels at {} degrees per pixel",
                region, dims, self.step_degrees
            )));
        }
        Ok(dims)
    }

    /// Column of the first pixel of `tile` within the raster of `parent`.
    ///
    /// Floors rather than rounds, so insertion windows of adjacent tiles
    /// are contiguous even when a boundary falls between pixel centres.
    pub fn column_offset(&self, parent: &Region, tile: &Region) -> i64 {
        ((tile.lon_min() - parent.lon_min()) / self.step_degrees).floor() as i64
    }

    /// Row of the first pixel of `tile` within the raster of `parent`.
    /// Rows count southward from the parent's northern edge.
    pub fn row_offset(&self, parent: &Region, tile: &Region) -> i64 {
        ((parent.lat_max() - tile.lat_max()) / self.step_degrees).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_degrees_conversion() {
        let step = step_degrees(111_320.0).unwrap();
        assert!((step - 1.0).abs() < 1e-12);

        let step = step_degrees(5000.0).unwrap();
        assert!((step - 5000.0 / 111_320.0).abs() < 1e-15);
    }

    #[test]
    fn test_step_degrees_rejects_non_positive() {
        assert_eq!(step_degrees(0.0), Err(GridError::InvalidResolution(0.0)));
        assert_eq!(
            step_degrees(-10.0),
            Err(GridError::InvalidResolution(-10.0))
        );
        assert!(step_degrees(f64::NAN).is_err());
        assert!(step_degrees(f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_step_degrees_rejects_zero() {
        assert!(ResolutionModel::from_step_degrees(0.0).is_err());
    }

    #[test]
    fn test_pixel_dimensions_rounding() {
        let model = ResolutionModel::from_step_degrees(1.0).unwrap();

        // 2.5 rounds half away from zero to 3, 2.4 rounds to 2
        let region = Region::new(0.0, 0.0, 2.5, 2.4).unwrap();
        assert_eq!(model.pixel_dimensions(&region), PixelDimensions::new(3, 2));
    }

    #[test]
    fn test_extent_rounding_matches_region_rounding() {
        let model = ResolutionModel::from_step_degrees(0.5).unwrap();
        let region = Region::new(0.0, 0.0, 1.25, 0.2).unwrap();

        assert_eq!(pixels_for_extent(1.25, 0.5), 3);
        assert_eq!(pixels_for_extent(0.2, 0.5), 0);
        assert_eq!(
            model.extent_dimensions(1.25, 0.2),
            model.pixel_dimensions(&region)
        );
    }

    #[test]
    fn test_pixel_dimensions_california_1km() {
        let model = ResolutionModel::from_meters(1000.0).unwrap();
        let region = Region::new(-122.5, 37.0, -121.5, 38.0).unwrap();
        let dims = model.pixel_dimensions(&region);
        // 1 degree / (1000 / 111320) = 111.32 -> 111
        assert_eq!(dims, PixelDimensions::new(111, 111));
    }

    #[test]
    fn test_raster_dimensions_rejects_sub_pixel_region() {
        let model = ResolutionModel::from_step_degrees(1.0).unwrap();
        let region = Region::new(0.0, 0.0, 0.2, 5.0).unwrap();
        assert!(matches!(
            model.raster_dimensions(&region),
            Err(GridError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_offsets_use_floor() {
        let model = ResolutionModel::from_step_degrees(1.0).unwrap();
        let parent = Region::new(0.0, 0.0, 4.0, 4.0).unwrap();
        let tile = Region::new(1.7, 0.0, 2.7, 2.3).unwrap();

        assert_eq!(model.column_offset(&parent, &tile), 1);
        // 4.0 - 2.3 = 1.7 -> floor 1
        assert_eq!(model.row_offset(&parent, &tile), 1);
    }

    #[test]
    fn test_offsets_of_origin_tile_are_zero() {
        let model = ResolutionModel::from_meters(500.0).unwrap();
        let parent = Region::new(13.0, 52.3, 13.7, 52.7).unwrap();
        assert_eq!(model.column_offset(&parent, &parent), 0);
        assert_eq!(model.row_offset(&parent, &parent), 0);
    }

    #[test]
    fn test_pixel_count() {
        assert_eq!(PixelDimensions::new(512, 256).pixel_count(), 131_072);
        assert!(PixelDimensions::new(0, 10).is_empty());
    }

    #[test]
    fn test_meters_round_trip() {
        let model = ResolutionModel::from_meters(250.0).unwrap();
        assert_eq!(model.meters_per_pixel(), 250.0);
        let again = ResolutionModel::from_step_degrees(model.step_degrees()).unwrap();
        assert!((again.meters_per_pixel() - 250.0).abs() < 1e-9);
    }
}
