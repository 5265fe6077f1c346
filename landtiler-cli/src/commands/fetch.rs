//! Fetch command - assemble a region from tiles and write it to disk.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use landtiler::assembler::{AssembledRaster, AssemblyProgress, RasterAssembler};
use landtiler::config::ConfigFile;
use landtiler::export::{export_csv, export_png, ColorMap, RasterMetadata};
use landtiler::policy::FailurePolicy;
use landtiler::provider::{GridEndpointProvider, ReqwestClient};
use landtiler::raster::ClassCode;
use landtiler::CancellationToken;
use tracing::info;

use super::common::{load_config, metadata_path_for, start_logging, GridArgs, GridPlan};
use crate::error::CliError;

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub config: Option<PathBuf>,
    pub grid: GridArgs,
    pub url: Option<String>,
    pub band: Option<String>,
    pub api_key: Option<String>,
    pub concurrency: Option<usize>,
    pub on_failure: Option<FailurePolicy>,
    pub default_value: Option<ClassCode>,
    pub output: PathBuf,
    pub png: Option<PathBuf>,
    pub allow_partial: bool,
}

/// Run the fetch command.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let _logging_guard = start_logging()?;

    let plan = args.grid.resolve(&config)?;
    let assembler = build_assembler(&args, &config, &plan)?;

    let dims = plan.model.raster_dimensions(&plan.region)?;
    let tile_dims = plan.tiles.tile_dimensions(&plan.region, &plan.model);

    println!("LandTiler v{}", env!("CARGO_PKG_VERSION"));
    println!("================================");
    println!();
    println!("Region:     {}", plan.region);
    println!(
        "Resolution: {} m/px ({:.6}°)",
        plan.model.meters_per_pixel(),
        plan.model.step_degrees()
    );
    println!("Raster:     {} pixels", dims);
    println!("Tiles:      {} (~{} px each)", plan.tiles, tile_dims);
    println!("Policy:     {}", assembler.config().failure_policy);
    println!();

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nCancelling, waiting for in-flight tiles...");
        handler_token.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let bar = progress_bar(plan.tiles.total() as u64)?;
    let bar_handle = bar.clone();
    let assembler = assembler
        .with_cancellation(cancel)
        .with_progress(Box::new(move |progress: AssemblyProgress| {
            bar_handle.set_position(progress.completed as u64);
        }));

    let assembled = match assembler.assemble(&plan.region, &plan.model) {
        Ok(assembled) => {
            bar.finish_and_clear();
            assembled
        }
        Err(e) => {
            bar.abandon();
            return Err(e.into());
        }
    };

    print_report(&assembled);
    write_outputs(&args, &assembled, assembler.config().default_value)
}

fn build_assembler(
    args: &FetchArgs,
    config: &ConfigFile,
    plan: &GridPlan,
) -> Result<RasterAssembler, CliError> {
    let url = args
        .url
        .clone()
        .or_else(|| config.source.url.clone())
        .ok_or_else(|| {
            CliError::Config(
                "No endpoint URL. Set url in the [source] section of config.ini or use --url"
                    .to_string(),
            )
        })?;

    let client = ReqwestClient::with_timeout(config.source.timeout).map_err(CliError::Client)?;
    let band = args.band.as_deref().unwrap_or(&config.source.band);
    let mut provider = GridEndpointProvider::new(client, url).with_band(band);
    if let Some(key) = args.api_key.as_ref().or(config.source.api_key.as_ref()) {
        provider = provider.with_api_key(key.as_str());
    }

    let mut assembly = config.assembly_config()?.with_tiles(plan.tiles);
    if let Some(policy) = args.on_failure {
        assembly = assembly.with_failure_policy(policy);
    }
    if let Some(concurrency) = args.concurrency {
        assembly = assembly.with_concurrency(concurrency);
    }
    if let Some(value) = args.default_value {
        assembly = assembly.with_default_value(value);
    }

    Ok(RasterAssembler::new(Arc::new(provider), assembly))
}

fn progress_bar(total: u64) -> Result<ProgressBar, CliError> {
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tiles ({eta})")
        .map_err(|e| CliError::Config(format!("Invalid progress template: {}", e)))?
        .progress_chars("#>-");
    let bar = ProgressBar::new(total);
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(200));
    Ok(bar)
}

fn print_report(assembled: &AssembledRaster) {
    let report = assembled.report();
    println!("Assembled {} raster: {}", assembled.dimensions(), report);

    if !report.failures.is_empty() {
        println!();
        println!("Failed tiles (filled with the default value):");
        for failure in &report.failures {
            println!("  {}", failure);
        }
    }
}

fn write_outputs(
    args: &FetchArgs,
    assembled: &AssembledRaster,
    default_value: ClassCode,
) -> Result<(), CliError> {
    export_csv(assembled, &args.output, args.allow_partial)?;
    info!(path = %args.output.display(), "Wrote CSV");
    println!("CSV: {}", args.output.display());

    let metadata = metadata_path_for(&args.output);
    RasterMetadata::from_assembled(assembled, default_value).save(&metadata)?;
    println!("Metadata: {}", metadata.display());

    if let Some(png) = &args.png {
        export_png(assembled, &ColorMap::modis_igbp(), png, args.allow_partial)?;
        info!(path = %png.display(), "Wrote PNG");
        println!("PNG: {}", png.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use landtiler::resolution::ResolutionModel;
    use landtiler::tiler::TileCount;

    fn args() -> FetchArgs {
        FetchArgs {
            config: None,
            grid: GridArgs {
                bbox: Some("0,0,2,1".to_string()),
                ..Default::default()
            },
            url: None,
            band: None,
            api_key: None,
            concurrency: Some(4),
            on_failure: Some(FailurePolicy::SkipTile),
            default_value: Some(-1),
            output: PathBuf::from("out.csv"),
            png: None,
            allow_partial: false,
        }
    }

    fn plan() -> GridPlan {
        GridPlan {
            region: "0,0,2,1".parse().unwrap(),
            model: ResolutionModel::from_step_degrees(0.5).unwrap(),
            tiles: TileCount::new(2, 1).unwrap(),
            max_pixels: 1_000,
        }
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let result = build_assembler(&args(), &ConfigFile::default(), &plan());
        assert!(matches!(result, Err(CliError::Config(ref msg)) if msg.contains("--url")));
    }

    #[test]
    fn test_flags_override_download_settings() {
        let mut config = ConfigFile::default();
        config.source.url = Some("http://localhost:1/grid".to_string());

        let assembler = build_assembler(&args(), &config, &plan()).unwrap();
        let assembly = assembler.config();
        assert_eq!(assembly.tiles, TileCount::new(2, 1).unwrap());
        assert_eq!(assembly.concurrency, 4);
        assert_eq!(assembly.failure_policy, FailurePolicy::SkipTile);
        assert_eq!(assembly.default_value, -1);
    }
}
