//! Plan command - show the tile layout without fetching.

use std::path::PathBuf;

use landtiler::assembler::insert_window;
use landtiler::tiler::subdivide;

use super::common::{load_config, GridArgs, GridPlan};
use crate::error::CliError;

/// Arguments for the plan command.
pub struct PlanArgs {
    pub config: Option<PathBuf>,
    pub grid: GridArgs,
    pub list: bool,
}

/// Run the plan command.
pub fn run(args: PlanArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let plan = args.grid.resolve(&config)?;

    for line in describe(&plan, args.list)? {
        println!("{}", line);
    }
    Ok(())
}

/// Builds the report printed by `plan`.
///
/// Fails the same way `fetch` would for a grid whose tiles round to zero
/// pixels.
fn describe(plan: &GridPlan, list: bool) -> Result<Vec<String>, CliError> {
    let dims = plan.model.raster_dimensions(&plan.region)?;
    let grid = subdivide(&plan.region, plan.tiles.x, plan.tiles.y)?;
    grid.check_footprint(&plan.model)?;
    let tile_dims = plan.tiles.tile_dimensions(&plan.region, &plan.model);
    let limit = plan.max_pixels;

    let mut lines = vec![
        format!("Region:     {}", plan.region),
        format!(
            "Resolution: {} m/px ({:.6}°)",
            plan.model.meters_per_pixel(),
            plan.model.step_degrees()
        ),
        format!("Raster:     {} pixels ({} cells)", dims, dims.pixel_count()),
        format!(
            "Tiles:      {} = {} requests of ~{} px",
            plan.tiles,
            plan.tiles.total(),
            tile_dims
        ),
    ];

    if tile_dims.pixel_count() > limit {
        lines.push(format!(
            "Warning: ~{} pixels per tile exceeds the request limit of {}; try --auto-tiles",
            tile_dims.pixel_count(),
            limit
        ));
    }

    if list {
        lines.push(String::new());
        for tile in &grid {
            let data = plan.model.pixel_dimensions(tile.region());
            let window = match insert_window(&plan.region, tile.region(), &plan.model, dims, data) {
                Some(w) => format!("rows {}..{}, cols {}..{}", w.row, w.row + w.rows, w.col, w.col + w.cols),
                None => "outside raster".to_string(),
            };
            lines.push(format!("  {} -> {}", tile, window));
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use landtiler::config::ConfigFile;
    use landtiler::resolution::ResolutionModel;
    use landtiler::tiler::TileCount;
    use landtiler::GridError;

    fn plan(tiles_x: usize, tiles_y: usize) -> GridPlan {
        GridPlan {
            region: "0,0,2,2".parse().unwrap(),
            model: ResolutionModel::from_step_degrees(0.5).unwrap(),
            tiles: TileCount::new(tiles_x, tiles_y).unwrap(),
            max_pixels: ConfigFile::default().grid.max_pixels_per_request,
        }
    }

    #[test]
    fn test_summary_lines() {
        let lines = describe(&plan(2, 2), false).unwrap();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("4×4"));
        assert!(lines[3].contains("4 requests"));
    }

    #[test]
    fn test_listing_covers_raster_in_sequence_order() {
        let lines = describe(&plan(2, 2), true).unwrap();
        let tiles: Vec<_> = lines.iter().filter(|l| l.starts_with("  tile")).collect();
        assert_eq!(tiles.len(), 4);
        // x-major from the south-west corner
        assert!(tiles[0].contains("rows 2..4, cols 0..2"));
        assert!(tiles[1].contains("rows 0..2, cols 0..2"));
        assert!(tiles[3].contains("rows 0..2, cols 2..4"));
    }

    #[test]
    fn test_warns_when_tiles_exceed_limit() {
        let plan = GridPlan {
            max_pixels: 3,
            ..plan(1, 1)
        };
        let lines = describe(&plan, false).unwrap();
        assert!(lines.iter().any(|l| l.starts_with("Warning")));
    }

    #[test]
    fn test_command_line_limit_drives_warning() {
        // 4x4 pixels per tile: over a 10 pixel limit, under the default
        let grid = GridArgs {
            bbox: Some("0,0,2,2".to_string()),
            resolution: Some(0.5 * landtiler::resolution::METERS_PER_DEGREE),
            auto_tiles: false,
            tiles_x: Some(1),
            tiles_y: Some(1),
            max_pixels: Some(10),
            ..Default::default()
        };
        let config = ConfigFile::default();
        assert!(config.grid.max_pixels_per_request >= 16);

        let plan = grid.resolve(&config).unwrap();
        let lines = describe(&plan, false).unwrap();
        let warning = lines.iter().find(|l| l.starts_with("Warning")).unwrap();
        assert!(warning.contains("limit of 10"));

        let plan = GridArgs {
            max_pixels: None,
            ..grid
        }
        .resolve(&config)
        .unwrap();
        let lines = describe(&plan, false).unwrap();
        assert!(!lines.iter().any(|l| l.starts_with("Warning")));
    }

    #[test]
    fn test_sub_pixel_tiles_are_rejected() {
        assert!(matches!(
            describe(&plan(16, 1), false),
            Err(CliError::Grid(GridError::EmptyTile { .. }))
        ));
    }
}
