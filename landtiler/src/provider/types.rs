//! Fetcher types and traits

use std::fmt;

use crate::raster::{ClassCode, TileData};
use crate::region::Region;

/// Errors that can occur while fetching a tile.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// HTTP request failed or returned a non-success status
    Http(String),
    /// Response body could not be interpreted as a class-code grid
    InvalidResponse(String),
    /// The service has no data for the requested area
    OutOfCoverage,
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// `OutOfCoverage` is a property of the data, not of the connection, so
    /// retrying it is pointless.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Http(_) | FetchError::InvalidResponse(_))
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(msg) => write!(f, "HTTP error: {}", msg),
            FetchError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            FetchError::OutOfCoverage => write!(f, "No data available for requested area"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Source of class-code tiles.
///
/// Implementors return the class codes covering `region` sampled every
/// `step_degrees` in both axes. The returned shape need not match the
/// expected pixel dimensions exactly; the assembler reconciles it.
pub trait TileFetcher: Send + Sync {
    /// Fetches one tile.
    ///
    /// # Arguments
    ///
    /// * `region` - Tile bounds
    /// * `step_degrees` - Degrees per pixel
    /// * `default_value` - Value for cells the service leaves empty
    fn fetch(
        &self,
        region: &Region,
        step_degrees: f64,
        default_value: ClassCode,
    ) -> Result<TileData, FetchError>;

    /// Returns the fetcher's name for logging and identification.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::Http("timeout".into()).is_retryable());
        assert!(FetchError::InvalidResponse("truncated".into()).is_retryable());
        assert!(!FetchError::OutOfCoverage.is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            FetchError::Http("HTTP 503".into()).to_string(),
            "HTTP error: HTTP 503"
        );
        assert_eq!(
            FetchError::OutOfCoverage.to_string(),
            "No data available for requested area"
        );
    }
}
