//! Grid endpoint provider.
//!
//! Fetches class-code grids from an HTTP endpoint that samples a land-cover
//! band over a rectangle and answers with JSON.
//!
//! # URL Template
//!
//! The endpoint is configured with a URL template. These placeholders are
//! substituted per tile:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{lon_min}` `{lat_min}` `{lon_max}` `{lat_max}` | Tile bounds in degrees |
//! | `{width}` `{height}` | Expected tile size in pixels |
//! | `{scale}` | Ground resolution in meters per pixel |
//! | `{band}` | Band name |
//!
//! When an API key is set it is appended as a `key` query parameter.
//!
//! # Response Formats
//!
//! - a bare 2-D array: `[[1, 2], [3, 4]]`
//! - a values object: `{"values": [[1, 2], [3, 4]]}`
//! - a sampled-rectangle feature: `{"properties": {"LC_Type1": [[1, 2], [3, 4]]}}`
//!
//! Fractional values are truncated toward zero and `null` cells take the
//! default value.

use serde_json::Value;
use tracing::trace;

use super::http::HttpClient;
use super::types::{FetchError, TileFetcher};
use crate::raster::{ClassCode, TileData};
use crate::region::Region;
use crate::resolution::{pixels_for_extent, METERS_PER_DEGREE};

/// Band sampled when none is configured (MODIS IGBP classification).
pub const DEFAULT_BAND: &str = "LC_Type1";

/// Land-cover provider for JSON grid endpoints.
///
/// # Example
///
/// ```ignore
/// use landtiler::provider::{GridEndpointProvider, ReqwestClient};
///
/// let client = ReqwestClient::new()?;
/// let provider = GridEndpointProvider::new(
///     client,
///     "https://example.org/sample?bbox={lon_min},{lat_min},{lon_max},{lat_max}&scale={scale}",
/// )
/// .with_band("LC_Type1");
/// ```
pub struct GridEndpointProvider<C: HttpClient> {
    http_client: C,
    url_template: String,
    band: String,
    api_key: Option<String>,
}

impl<C: HttpClient> GridEndpointProvider<C> {
    pub fn new(http_client: C, url_template: impl Into<String>) -> Self {
        Self {
            http_client,
            url_template: url_template.into(),
            band: DEFAULT_BAND.to_string(),
            api_key: None,
        }
    }

    pub fn with_band(mut self, band: impl Into<String>) -> Self {
        self.band = band.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn band(&self) -> &str {
        &self.band
    }

    /// Builds the request URL for one tile.
    fn build_url(&self, region: &Region, step_degrees: f64) -> String {
        let width = pixels_for_extent(region.width_degrees(), step_degrees);
        let height = pixels_for_extent(region.height_degrees(), step_degrees);
        let scale = step_degrees * METERS_PER_DEGREE;

        let mut url = self
            .url_template
            .replace("{lon_min}", &region.lon_min().to_string())
            .replace("{lat_min}", &region.lat_min().to_string())
            .replace("{lon_max}", &region.lon_max().to_string())
            .replace("{lat_max}", &region.lat_max().to_string())
            .replace("{width}", &width.to_string())
            .replace("{height}", &height.to_string())
            .replace("{scale}", &scale.to_string())
            .replace("{band}", &self.band);

        if let Some(key) = &self.api_key {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str("key=");
            url.push_str(key);
        }
        url
    }

    /// Locates the 2-D grid inside a decoded response.
    fn extract_grid<'a>(&self, body: &'a Value) -> Result<&'a Vec<Value>, FetchError> {
        let grid = match body {
            Value::Array(_) => body,
            Value::Object(map) => {
                if let Some(values) = map.get("values") {
                    values
                } else if let Some(properties) = map.get("properties") {
                    properties.get(&self.band).ok_or_else(|| {
                        FetchError::InvalidResponse(format!(
                            "band '{}' missing from response properties",
                            self.band
                        ))
                    })?
                } else {
                    return Err(FetchError::InvalidResponse(
                        "expected 'values' or 'properties' in response".to_string(),
                    ));
                }
            }
            _ => {
                return Err(FetchError::InvalidResponse(
                    "response is not a JSON array or object".to_string(),
                ))
            }
        };

        grid.as_array()
            .ok_or_else(|| FetchError::InvalidResponse("grid is not an array".to_string()))
    }
}

/// Parses one JSON cell into a class code.
fn parse_cell(cell: &Value, default_value: ClassCode) -> Result<ClassCode, FetchError> {
    let raw = match cell {
        Value::Null => return Ok(default_value),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => n
                .as_f64()
                .map(|f| f.trunc() as i64)
                .ok_or_else(|| FetchError::InvalidResponse(format!("bad number {}", n)))?,
        },
        other => {
            return Err(FetchError::InvalidResponse(format!(
                "expected a number, got {}",
                other
            )))
        }
    };

    ClassCode::try_from(raw)
        .map_err(|_| FetchError::InvalidResponse(format!("class code {} out of range", raw)))
}

/// Decodes a response body into tile data.
fn parse_grid(rows: &[Value], default_value: ClassCode) -> Result<TileData, FetchError> {
    let mut parsed = Vec::with_capacity(rows.len());
    for (r, row) in rows.iter().enumerate() {
        let cells = row
            .as_array()
            .ok_or_else(|| FetchError::InvalidResponse(format!("row {} is not an array", r)))?;
        let values = cells
            .iter()
            .map(|cell| parse_cell(cell, default_value))
            .collect::<Result<Vec<_>, _>>()?;
        parsed.push(values);
    }
    Ok(TileData::from_rows(parsed))
}

impl<C: HttpClient> TileFetcher for GridEndpointProvider<C> {
    fn fetch(
        &self,
        region: &Region,
        step_degrees: f64,
        default_value: ClassCode,
    ) -> Result<TileData, FetchError> {
        let url = self.build_url(region, step_degrees);
        trace!(url = %url, "Requesting tile");

        let body = self.http_client.get(&url)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(FetchError::OutOfCoverage);
        }

        let json: Value = serde_json::from_slice(&body)
            .map_err(|e| FetchError::InvalidResponse(format!("malformed JSON: {}", e)))?;
        let rows = self.extract_grid(&json)?;

        let tile = parse_grid(rows, default_value)?;
        if tile.is_empty() {
            return Err(FetchError::OutOfCoverage);
        }
        Ok(tile)
    }

    fn name(&self) -> &str {
        "GridEndpoint"
    }
}
