//! LandTiler CLI - Command-line interface
//!
//! Fetches land-cover rasters for regions larger than a single service
//! request allows, and renders the results.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use landtiler::policy::FailurePolicy;
use landtiler::raster::ClassCode;

use commands::fetch::FetchArgs;
use commands::plan::PlanArgs;
use commands::render::RenderArgs;
use commands::GridArgs;

#[derive(Parser)]
#[command(name = "landtiler")]
#[command(version)]
#[command(about = "Fetch land-cover rasters one tile at a time", long_about = None)]
struct Cli {
    /// Config file (default: ~/.landtiler/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a region tile by tile and write the assembled raster
    Fetch {
        /// Named region (see 'landtiler regions')
        #[arg(long, conflicts_with = "bbox", required_unless_present = "bbox")]
        region: Option<String>,

        /// Explicit bounds as lon_min,lat_min,lon_max,lat_max
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<String>,

        /// Ground resolution in meters per pixel
        #[arg(long)]
        resolution: Option<f64>,

        /// Tiles along longitude
        #[arg(long)]
        tiles_x: Option<usize>,

        /// Tiles along latitude
        #[arg(long)]
        tiles_y: Option<usize>,

        /// Pick the tile count from the per-request pixel limit
        #[arg(long, conflicts_with_all = ["tiles_x", "tiles_y"])]
        auto_tiles: bool,

        /// Per-request pixel limit used with --auto-tiles
        #[arg(long, requires = "auto_tiles")]
        max_pixels: Option<usize>,

        /// Endpoint URL template (overrides [source] url)
        #[arg(long)]
        url: Option<String>,

        /// Band requested from the endpoint
        #[arg(long)]
        band: Option<String>,

        /// API key appended to every request
        #[arg(long)]
        api_key: Option<String>,

        /// Tiles fetched at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// What to do when a tile fails: abort or skip
        #[arg(long)]
        on_failure: Option<FailurePolicy>,

        /// Class code for cells no tile covers
        #[arg(long, allow_hyphen_values = true)]
        default_value: Option<ClassCode>,

        /// CSV output path
        #[arg(short, long, default_value = "landcover_grid.csv")]
        output: PathBuf,

        /// Also render a colour-mapped PNG
        #[arg(long)]
        png: Option<PathBuf>,

        /// Write output even if some tiles failed
        #[arg(long)]
        allow_partial: bool,
    },

    /// Show how a region would be split without fetching anything
    Plan {
        /// Named region (see 'landtiler regions')
        #[arg(long, conflicts_with = "bbox", required_unless_present = "bbox")]
        region: Option<String>,

        /// Explicit bounds as lon_min,lat_min,lon_max,lat_max
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<String>,

        /// Ground resolution in meters per pixel
        #[arg(long)]
        resolution: Option<f64>,

        /// Tiles along longitude
        #[arg(long)]
        tiles_x: Option<usize>,

        /// Tiles along latitude
        #[arg(long)]
        tiles_y: Option<usize>,

        /// Pick the tile count from the per-request pixel limit
        #[arg(long, conflicts_with_all = ["tiles_x", "tiles_y"])]
        auto_tiles: bool,

        /// Per-request pixel limit used with --auto-tiles
        #[arg(long, requires = "auto_tiles")]
        max_pixels: Option<usize>,

        /// List every tile with its bounds and raster window
        #[arg(long)]
        list: bool,
    },

    /// List named regions
    Regions,

    /// Render a previously saved CSV raster as a PNG
    Render {
        /// CSV raster to read
        input: PathBuf,

        /// PNG output path (default: input with .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print how many cells each class covers
        #[arg(long)]
        stats: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Fetch {
            region,
            bbox,
            resolution,
            tiles_x,
            tiles_y,
            auto_tiles,
            max_pixels,
            url,
            band,
            api_key,
            concurrency,
            on_failure,
            default_value,
            output,
            png,
            allow_partial,
        } => commands::fetch::run(FetchArgs {
            config,
            grid: GridArgs {
                region,
                bbox,
                resolution,
                tiles_x,
                tiles_y,
                auto_tiles,
                max_pixels,
            },
            url,
            band,
            api_key,
            concurrency,
            on_failure,
            default_value,
            output,
            png,
            allow_partial,
        }),

        Commands::Plan {
            region,
            bbox,
            resolution,
            tiles_x,
            tiles_y,
            auto_tiles,
            max_pixels,
            list,
        } => commands::plan::run(PlanArgs {
            config,
            grid: GridArgs {
                region,
                bbox,
                resolution,
                tiles_x,
                tiles_y,
                auto_tiles,
                max_pixels,
            },
            list,
        }),

        Commands::Regions => commands::regions::run(config),

        Commands::Render {
            input,
            output,
            stats,
        } => commands::render::run(RenderArgs {
            input,
            output,
            stats,
        }),
    };

    if let Err(e) = result {
        e.exit();
    }
}
