//! Class code to colour mapping.

use std::collections::HashMap;

use image::Rgb;

use crate::raster::ClassCode;

/// Colour for class codes without an entry.
pub const FALLBACK_COLOR: Rgb<u8> = Rgb([255, 0, 255]);

/// MODIS IGBP land-cover classes (`LC_Type1`) with their display colours.
const MODIS_IGBP: [(&str, [u8; 3]); 18] = [
    ("Water", [0, 0, 255]),
    ("Evergreen needleleaf forest", [0, 100, 0]),
    ("Evergreen broadleaf forest", [34, 139, 34]),
    ("Deciduous needleleaf forest", [50, 205, 50]),
    ("Deciduous broadleaf forest", [144, 238, 144]),
    ("Mixed forest", [0, 128, 0]),
    ("Closed shrublands", [160, 82, 45]),
    ("Open shrublands", [205, 133, 63]),
    ("Woody savannas", [154, 205, 50]),
    ("Savannas", [255, 215, 0]),
    ("Grasslands", [255, 255, 0]),
    ("Permanent wetlands", [0, 255, 255]),
    ("Croplands", [255, 165, 0]),
    ("Urban and built-up", [255, 0, 0]),
    ("Cropland/natural vegetation mosaic", [255, 192, 203]),
    ("Snow and ice", [255, 255, 255]),
    ("Barren or sparsely vegetated", [128, 128, 128]),
    ("Unclassified", [0, 0, 0]),
];

#[derive(Debug, Clone)]
struct ClassEntry {
    label: String,
    color: Rgb<u8>,
}

/// Lookup table from class code to RGB colour and label.
#[derive(Debug, Clone)]
pub struct ColorMap {
    entries: HashMap<ClassCode, ClassEntry>,
    fallback: Rgb<u8>,
}

impl ColorMap {
    /// Empty map; every code renders in the fallback colour.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: FALLBACK_COLOR,
        }
    }

    /// The 18-class MODIS IGBP palette (0 water to 17 unclassified).
    pub fn modis_igbp() -> Self {
        let mut map = Self::new();
        for (code, (label, rgb)) in MODIS_IGBP.iter().enumerate() {
            map.insert(code as ClassCode, *label, Rgb(*rgb));
        }
        map
    }

    pub fn insert(&mut self, code: ClassCode, label: impl Into<String>, color: Rgb<u8>) {
        self.entries.insert(
            code,
            ClassEntry {
                label: label.into(),
                color,
            },
        );
    }

    pub fn with_fallback(mut self, color: Rgb<u8>) -> Self {
        self.fallback = color;
        self
    }

    pub fn color(&self, code: ClassCode) -> Rgb<u8> {
        self.entries
            .get(&code)
            .map(|entry| entry.color)
            .unwrap_or(self.fallback)
    }

    pub fn label(&self, code: ClassCode) -> Option<&str> {
        self.entries.get(&code).map(|entry| entry.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::modis_igbp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modis_palette() {
        let map = ColorMap::modis_igbp();
        assert_eq!(map.len(), 18);
        assert_eq!(map.color(0), Rgb([0, 0, 255]));
        assert_eq!(map.color(13), Rgb([255, 0, 0]));
        assert_eq!(map.color(17), Rgb([0, 0, 0]));
        assert_eq!(map.label(12), Some("Croplands"));
    }

    #[test]
    fn test_unknown_code_uses_fallback() {
        let map = ColorMap::modis_igbp();
        assert_eq!(map.color(18), FALLBACK_COLOR);
        assert_eq!(map.color(-1), FALLBACK_COLOR);
        assert_eq!(map.label(99), None);

        let map = map.with_fallback(Rgb([1, 2, 3]));
        assert_eq!(map.color(42), Rgb([1, 2, 3]));
    }

    #[test]
    fn test_custom_entries_override() {
        let mut map = ColorMap::modis_igbp();
        map.insert(0, "Ocean", Rgb([0, 0, 128]));
        assert_eq!(map.color(0), Rgb([0, 0, 128]));
        assert_eq!(map.label(0), Some("Ocean"));
    }
}
