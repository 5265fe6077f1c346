//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::{ConfigFile, MAX_CONCURRENCY};
use crate::region::Region;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = non_empty(section, "url") {
            config.source.url = Some(v.to_string());
        }
        if let Some(v) = non_empty(section, "band") {
            config.source.band = v.to_string();
        }
        if let Some(v) = non_empty(section, "api_key") {
            config.source.api_key = Some(v.to_string());
        }
        if let Some(v) = section.get("timeout") {
            config.source.timeout = parse_positive(
                "source",
                "timeout",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
    }

    // [grid] section
    if let Some(section) = ini.section(Some("grid")) {
        if let Some(v) = section.get("resolution") {
            let resolution: f64 = parse_value("grid", "resolution", v, "must be a number")?;
            if !resolution.is_finite() || resolution <= 0.0 {
                return Err(invalid(
                    "grid",
                    "resolution",
                    v,
                    "must be a positive number of meters per pixel",
                ));
            }
            config.grid.resolution = resolution;
        }
        if let Some(v) = section.get("tiles_x") {
            config.grid.tiles_x =
                parse_positive("grid", "tiles_x", v, "must be a positive integer")?;
        }
        if let Some(v) = section.get("tiles_y") {
            config.grid.tiles_y =
                parse_positive("grid", "tiles_y", v, "must be a positive integer")?;
        }
        if let Some(v) = section.get("default_value") {
            config.grid.default_value =
                parse_value("grid", "default_value", v, "must be an integer class code")?;
        }
        if let Some(v) = section.get("max_pixels_per_request") {
            config.grid.max_pixels_per_request = parse_positive(
                "grid",
                "max_pixels_per_request",
                v,
                "must be a positive integer",
            )?;
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("max_attempts") {
            config.download.max_attempts =
                parse_positive("download", "max_attempts", v, "must be a positive integer")?;
        }
        if let Some(v) = section.get("initial_backoff_ms") {
            config.download.initial_backoff_ms = parse_value(
                "download",
                "initial_backoff_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )?;
        }
        if let Some(v) = section.get("max_backoff_ms") {
            config.download.max_backoff_ms = parse_value(
                "download",
                "max_backoff_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )?;
        }
        if let Some(v) = section.get("concurrency") {
            let concurrency: usize =
                parse_positive("download", "concurrency", v, "must be a positive integer")?;
            if concurrency > MAX_CONCURRENCY {
                return Err(invalid(
                    "download",
                    "concurrency",
                    v,
                    &format!("must be at most {}", MAX_CONCURRENCY),
                ));
            }
            config.download.concurrency = concurrency;
        }
        if let Some(v) = section.get("on_failure") {
            config.download.on_failure = v
                .parse()
                .map_err(|_| invalid("download", "on_failure", v, "must be 'abort' or 'skip'"))?;
        }
    }

    // [regions] section: name = lon_min, lat_min, lon_max, lat_max
    if let Some(section) = ini.section(Some("regions")) {
        for (name, v) in section.iter() {
            let region = Region::from_str(v).map_err(|e| invalid("regions", name, v, &e.to_string()))?;
            config.regions.push((name.to_string(), region.bounds()));
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

/// Parses an integer that must be at least one.
fn parse_positive<T>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialOrd + From<u8>,
{
    let parsed: T = parse_value(section, key, value, reason)?;
    if parsed < T::from(1u8) {
        return Err(invalid(section, key, value, reason));
    }
    Ok(parsed)
}
