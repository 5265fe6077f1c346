//! Named region presets.

use std::collections::BTreeMap;

use super::types::Region;
use crate::error::GridError;

/// Built-in presets as `(name, [lon_min, lat_min, lon_max, lat_max])`.
const BUILTIN_PRESETS: &[(&str, [f64; 4])] = &[
    ("California", [-122.5, 37.0, -121.5, 38.0]),
    ("Berlin", [13.0, 52.3, 13.7, 52.7]),
    ("Sahara", [-10.0, 15.0, 30.0, 30.0]),
    ("Ukraine", [19.0, 45.0, 44.0, 52.0]),
    ("World", [-180.0, -90.0, 180.0, 90.0]),
    ("NorthEast", [0.0, 0.0, 180.0, 90.0]),
    ("NorthWest", [-180.0, 0.0, 0.0, 90.0]),
    ("SouthWest", [-180.0, -90.0, 0.0, 0.0]),
    ("SouthEast", [0.0, -90.0, 180.0, 0.0]),
];

/// Mapping of preset name to validated region.
///
/// Names are matched exactly first, then case-insensitively, so `"berlin"`
/// resolves to the `"Berlin"` preset.
#[derive(Debug, Clone, Default)]
pub struct RegionPresets {
    regions: BTreeMap<String, Region>,
}

impl RegionPresets {
    /// Creates an empty preset table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the table of built-in presets.
    pub fn builtin() -> Self {
        let regions = BUILTIN_PRESETS
            .iter()
            .map(|(name, bounds)| {
                (
                    name.to_string(),
                    Region::from_edges(bounds[0], bounds[1], bounds[2], bounds[3]),
                )
            })
            .collect();
        Self { regions }
    }

    /// Adds or replaces a preset.
    ///
    /// Bounds are validated here so that an inverted entry fails when the
    /// table is built rather than when the region is fetched.
    pub fn insert(&mut self, name: impl Into<String>, bounds: [f64; 4]) -> Result<(), GridError> {
        let name = name.into();
        let region = Region::from_bounds(bounds).map_err(|e| match e {
            GridError::InvalidRegion(reason) => {
                GridError::InvalidRegion(format!("preset '{}': {}", name, reason))
            }
            other => other,
        })?;
        self.regions.insert(name, region);
        Ok(())
    }

    /// Looks up a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownRegion`] listing all valid names if no
    /// preset matches.
    pub fn resolve(&self, name: &str) -> Result<Region, GridError> {
        if let Some(region) = self.regions.get(name) {
            return Ok(*region);
        }

        self.regions
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, region)| *region)
            .ok_or_else(|| GridError::UnknownRegion {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.regions.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Region)> {
        self.regions.iter().map(|(name, region)| (name.as_str(), region))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// How the caller picked the area of interest.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionSelector {
    /// A preset name, resolved against a [`RegionPresets`] table.
    Preset(String),
    /// Explicit coordinates.
    Explicit(Region),
}

impl RegionSelector {
    /// Resolves the selector to a concrete region.
    pub fn resolve(&self, presets: &RegionPresets) -> Result<Region, GridError> {
        match self {
            RegionSelector::Preset(name) => presets.resolve(name),
            RegionSelector::Explicit(region) => Ok(*region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_are_valid() {
        let presets = RegionPresets::builtin();
        assert_eq!(presets.len(), BUILTIN_PRESETS.len());
        for (name, bounds) in BUILTIN_PRESETS {
            assert!(
                Region::from_bounds(*bounds).is_ok(),
                "preset {} has invalid bounds",
                name
            );
        }
    }

    #[test]
    fn test_resolve_exact() {
        let presets = RegionPresets::builtin();
        let berlin = presets.resolve("Berlin").unwrap();
        assert_eq!(berlin.bounds(), [13.0, 52.3, 13.7, 52.7]);
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let presets = RegionPresets::builtin();
        let region = presets.resolve("southeast").unwrap();
        assert_eq!(region.bounds(), [0.0, -90.0, 180.0, 0.0]);
    }

    #[test]
    fn test_resolve_unknown_lists_names() {
        let presets = RegionPresets::builtin();
        match presets.resolve("Atlantis") {
            Err(GridError::UnknownRegion { name, available }) => {
                assert_eq!(name, "Atlantis");
                assert!(available.contains(&"Berlin".to_string()));
                let mut sorted = available.clone();
                sorted.sort();
                assert_eq!(available, sorted, "names should be sorted");
            }
            other => panic!("Expected UnknownRegion, got {:?}", other),
        }
    }

    #[test]
    fn test_insert_rejects_inverted_bounds() {
        let mut presets = RegionPresets::new();
        let result = presets.insert("earth", [-180.0, 180.0, -90.0, 90.0]);
        match result {
            Err(GridError::InvalidRegion(msg)) => assert!(msg.contains("earth")),
            other => panic!("Expected InvalidRegion, got {:?}", other),
        }
        assert!(presets.is_empty());
    }

    #[test]
    fn test_insert_overrides_builtin() {
        let mut presets = RegionPresets::builtin();
        presets.insert("Berlin", [13.1, 52.4, 13.6, 52.6]).unwrap();
        assert_eq!(
            presets.resolve("Berlin").unwrap().bounds(),
            [13.1, 52.4, 13.6, 52.6]
        );
    }

    #[test]
    fn test_selector_explicit() {
        let region = Region::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let selector = RegionSelector::Explicit(region);
        assert_eq!(selector.resolve(&RegionPresets::new()).unwrap(), region);
    }

    #[test]
    fn test_selector_preset() {
        let selector = RegionSelector::Preset("Sahara".to_string());
        let region = selector.resolve(&RegionPresets::builtin()).unwrap();
        assert_eq!(region.bounds(), [-10.0, 15.0, 30.0, 30.0]);
    }
}
