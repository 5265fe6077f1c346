//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use landtiler::config::ConfigFile;
use landtiler::logging::{default_log_dir, default_log_file, init_logging, LoggingGuard};
use landtiler::region::{Region, RegionPresets, RegionSelector};
use landtiler::resolution::ResolutionModel;
use landtiler::tiler::TileCount;

use crate::error::CliError;

/// Region and grid options shared by `fetch` and `plan`.
#[derive(Debug, Clone, Default)]
pub struct GridArgs {
    pub region: Option<String>,
    pub bbox: Option<String>,
    pub resolution: Option<f64>,
    pub tiles_x: Option<usize>,
    pub tiles_y: Option<usize>,
    pub auto_tiles: bool,
    pub max_pixels: Option<usize>,
}

/// Fully resolved grid geometry.
#[derive(Debug, Clone)]
pub struct GridPlan {
    pub region: Region,
    pub model: ResolutionModel,
    pub tiles: TileCount,
    /// Per-request pixel limit, from `--max-pixels` or the config file
    pub max_pixels: usize,
}

impl GridArgs {
    /// Turns `--region`/`--bbox` into a selector.
    pub fn selector(&self) -> Result<RegionSelector, CliError> {
        match (&self.region, &self.bbox) {
            (_, Some(bbox)) => Ok(RegionSelector::Explicit(bbox.parse()?)),
            (Some(name), None) => Ok(RegionSelector::Preset(name.clone())),
            (None, None) => Err(CliError::Config(
                "either --region or --bbox is required".to_string(),
            )),
        }
    }

    /// Resolves region, resolution and tile count, with command-line values
    /// taking precedence over the config file.
    pub fn resolve(&self, config: &ConfigFile) -> Result<GridPlan, CliError> {
        let presets: RegionPresets = config.presets()?;
        let region = self.selector()?.resolve(&presets)?;
        let model =
            ResolutionModel::from_meters(self.resolution.unwrap_or(config.grid.resolution))?;

        let max_pixels = self
            .max_pixels
            .unwrap_or(config.grid.max_pixels_per_request);
        let tiles = if self.auto_tiles {
            TileCount::for_pixel_limit(&region, &model, max_pixels)?
        } else {
            TileCount::new(
                self.tiles_x.unwrap_or(config.grid.tiles_x),
                self.tiles_y.unwrap_or(config.grid.tiles_y),
            )?
        };

        Ok(GridPlan {
            region,
            model,
            tiles,
            max_pixels,
        })
    }
}

/// Loads the config file from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Installs the file and stderr log layers.
pub fn start_logging() -> Result<LoggingGuard, CliError> {
    init_logging(&default_log_dir(), default_log_file())
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}

/// `input.csv` -> `input.png`
pub fn png_path_for(input: &Path) -> PathBuf {
    input.with_extension("png")
}

/// `grid.csv` -> `grid.json`
pub fn metadata_path_for(csv: &Path) -> PathBuf {
    csv.with_extension("json")
}
