//! Render command - colour a saved CSV raster.

use std::collections::BTreeMap;
use std::path::PathBuf;

use landtiler::export::{load_csv, render_png, ColorMap, RasterMetadata};
use landtiler::raster::{ClassCode, RasterBuffer};

use super::common::{metadata_path_for, png_path_for};
use crate::error::CliError;

/// Arguments for the render command.
pub struct RenderArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub stats: bool,
}

/// Run the render command.
pub fn run(args: RenderArgs) -> Result<(), CliError> {
    let raster = load_csv(&args.input)?;
    let output = args
        .output
        .unwrap_or_else(|| png_path_for(&args.input));
    let colormap = ColorMap::modis_igbp();

    render_png(&raster, &colormap, &output)?;
    println!(
        "Rendered {}x{} raster to {}",
        raster.width(),
        raster.height(),
        output.display()
    );

    let sidecar = metadata_path_for(&args.input);
    if sidecar.exists() {
        let metadata = RasterMetadata::load(&sidecar)?;
        let [lon_min, lat_min, lon_max, lat_max] = metadata.bounds;
        println!(
            "Covers lon {}..{}, lat {}..{} at {}° per pixel",
            lon_min, lon_max, lat_min, lat_max, metadata.step_degrees
        );
        if metadata.is_partial() {
            println!(
                "Partial raster: tiles {:?} hold the default value {}",
                metadata.failed_tiles, metadata.default_value
            );
        }
    }

    if args.stats {
        println!();
        for line in class_breakdown(&raster, &colormap) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// One line per class present, most common first.
fn class_breakdown(raster: &RasterBuffer, colormap: &ColorMap) -> Vec<String> {
    let mut counts: BTreeMap<ClassCode, usize> = BTreeMap::new();
    for code in raster.cells() {
        *counts.entry(*code).or_default() += 1;
    }

    let total = raster.cells().len().max(1) as f64;
    let mut classes: Vec<(ClassCode, usize)> = counts.into_iter().collect();
    classes.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    classes
        .into_iter()
        .map(|(code, count)| {
            format!(
                "  {:>4}  {:<36} {:>10} cells ({:5.1}%)",
                code,
                colormap.label(code).unwrap_or("unknown"),
                count,
                count as f64 * 100.0 / total
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use landtiler::export::save_csv;

    #[test]
    fn test_breakdown_orders_by_count() {
        let raster = RasterBuffer::from_cells(2, 2, vec![0, 12, 12, 99]).unwrap();
        let lines = class_breakdown(&raster, &ColorMap::modis_igbp());

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Croplands"));
        assert!(lines[0].contains("50.0%"));
        assert!(lines[1].contains("Water"));
        assert!(lines[2].contains("unknown"));
    }

    #[test]
    fn test_render_writes_png_next_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("grid.csv");
        let raster = RasterBuffer::from_cells(3, 1, vec![1, 2, 3]).unwrap();
        save_csv(&raster, &input).unwrap();

        run(RenderArgs {
            input: input.clone(),
            output: None,
            stats: false,
        })
        .unwrap();

        assert!(dir.path().join("grid.png").exists());
    }

    #[test]
    fn test_missing_input_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(RenderArgs {
            input: dir.path().join("missing.csv"),
            output: None,
            stats: false,
        });
        assert!(matches!(result, Err(CliError::Export(_))));
    }
}
