//! Regions command - list named regions.

use std::path::PathBuf;

use landtiler::region::RegionPresets;

use super::common::load_config;
use crate::error::CliError;

/// Run the regions command.
pub fn run(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let presets = config.presets()?;

    println!("Named regions (lon_min, lat_min, lon_max, lat_max):");
    println!();
    for line in format_presets(&presets) {
        println!("{}", line);
    }
    if !config.regions.is_empty() {
        println!();
        println!("{} region(s) from config.ini", config.regions.len());
    }
    Ok(())
}

fn format_presets(presets: &RegionPresets) -> Vec<String> {
    let width = presets.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut lines: Vec<String> = presets
        .iter()
        .map(|(name, region)| format!("  {:<width$}  {}", name, region, width = width))
        .collect();
    lines.sort();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_aligned_and_sorted() {
        let mut presets = RegionPresets::new();
        presets.insert("Zeta", [0.0, 0.0, 1.0, 1.0]).unwrap();
        presets.insert("Al", [-10.0, -5.0, 10.0, 5.0]).unwrap();

        let lines = format_presets(&presets);
        assert_eq!(
            lines,
            vec![
                "  Al    [-10, -5, 10, 5]".to_string(),
                "  Zeta  [0, 0, 1, 1]".to_string(),
            ]
        );
    }
}
