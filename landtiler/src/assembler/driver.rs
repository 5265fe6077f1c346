//! Raster assembly driver.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::AssemblyConfig;
use super::error::AssemblyError;
use super::placement::insert_window;
use super::report::{
    AssembledRaster, AssemblyProgress, AssemblyReport, ProgressCallback, TileFailure,
};
use crate::policy::{FailurePolicy, RetryPolicy};
use crate::provider::{FetchError, TileFetcher};
use crate::raster::{ClassCode, RasterBuffer, TileData};
use crate::region::Region;
use crate::resolution::ResolutionModel;
use crate::tiler::{subdivide, Tile, TileGrid};

/// Longest uninterrupted sleep while waiting out a retry delay.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Tiles each worker may fetch ahead of the next tile to place.
const LOOKAHEAD_PER_WORKER: usize = 2;

/// Result of fetching one tile, including retries.
enum TileOutcome {
    Fetched { data: TileData, attempts: u32 },
    Failed { error: FetchError, attempts: u32 },
    Cancelled,
}

/// Fetches tiles for a region and stitches them into one raster.
///
/// The assembler owns the output buffer for the whole run and is its only
/// writer. With `concurrency > 1`, scoped worker threads fetch tiles and send
/// them back over a channel; tiles are still placed in sequence order so the
/// output is identical to a sequential run. Workers never claim more than
/// `LOOKAHEAD_PER_WORKER` tiles each beyond the next tile to place, so a slow
/// tile holds back at most that many finished tiles in memory.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use landtiler::assembler::{AssemblyConfig, RasterAssembler};
///
/// let assembler = RasterAssembler::new(Arc::new(provider), AssemblyConfig::default())
///     .with_cancellation(token.clone());
/// let assembled = assembler.assemble(&region, &model)?;
/// ```
pub struct RasterAssembler {
    fetcher: Arc<dyn TileFetcher>,
    config: AssemblyConfig,
    cancel: CancellationToken,
    progress: Option<ProgressCallback>,
}

impl RasterAssembler {
    pub fn new(fetcher: Arc<dyn TileFetcher>, config: AssemblyConfig) -> Self {
        Self {
            fetcher,
            config,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Uses `token` to stop the assembly early.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Builds the raster for `region` at the resolution of `model`.
    ///
    /// # Errors
    ///
    /// - [`AssemblyError::Config`] if the region is too small for the
    ///   resolution, the tile count is invalid, or any tile would span less
    ///   than one pixel. Nothing is fetched.
    /// - [`AssemblyError::TileFetch`] for the first failed tile under
    ///   [`FailurePolicy::Abort`].
    /// - [`AssemblyError::Cancelled`] if the cancellation token fires.
    pub fn assemble(
        &self,
        region: &Region,
        model: &ResolutionModel,
    ) -> Result<AssembledRaster, AssemblyError> {
        let dims = model.raster_dimensions(region)?;
        let grid = subdivide(region, self.config.tiles.x, self.config.tiles.y)?;
        grid.check_footprint(model)?;

        info!(
            region = %region,
            dimensions = %dims,
            tiles = %self.config.tiles,
            step_degrees = model.step_degrees(),
            fetcher = self.fetcher.name(),
            concurrency = self.config.concurrency,
            "Starting raster assembly"
        );
        let start = Instant::now();

        let mut state = AssemblyState {
            raster: RasterBuffer::new(dims, self.config.default_value),
            report: AssemblyReport::new(grid.len()),
            completed: AtomicUsize::new(0),
        };

        if self.config.concurrency <= 1 || grid.len() <= 1 {
            self.run_sequential(&grid, model, &mut state)?;
        } else {
            self.run_parallel(&grid, model, &mut state)?;
        }

        let AssemblyState { raster, report, .. } = state;
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            summary = %report,
            "Raster assembly complete"
        );

        Ok(AssembledRaster::new(
            raster,
            *region,
            model.step_degrees(),
            report,
        ))
    }

    fn run_sequential(
        &self,
        grid: &TileGrid,
        model: &ResolutionModel,
        state: &mut AssemblyState,
    ) -> Result<(), AssemblyError> {
        for tile in grid {
            let outcome = fetch_with_retry(
                self.fetcher.as_ref(),
                tile,
                model.step_degrees(),
                self.config.default_value,
                &self.config.retry_policy,
                &self.cancel,
            );
            self.handle_outcome(grid, tile, outcome, model, state)?;
        }
        Ok(())
    }

    fn run_parallel(
        &self,
        grid: &TileGrid,
        model: &ResolutionModel,
        state: &mut AssemblyState,
    ) -> Result<(), AssemblyError> {
        let workers = self.config.concurrency.min(grid.len());
        // Cancelled either by the caller or by us when a tile aborts the run
        let worker_cancel = self.cancel.child_token();
        let next_index = AtomicUsize::new(0);
        let step = model.step_degrees();

        // One permit per tile that may be claimed but not yet placed
        let window = workers * LOOKAHEAD_PER_WORKER;
        let (permit_tx, permit_rx) = mpsc::channel::<()>();
        for _ in 0..window {
            let _ = permit_tx.send(());
        }
        let permit_rx = Mutex::new(permit_rx);

        thread::scope(|scope| {
            let (tx, rx) = mpsc::channel::<(usize, TileOutcome)>();

            for _ in 0..workers {
                let tx = tx.clone();
                let next_index = &next_index;
                let worker_cancel = &worker_cancel;
                let permit_rx = &permit_rx;
                let fetcher = self.fetcher.as_ref();
                let config = &self.config;

                scope.spawn(move || loop {
                    // Closed once every tile is placed or the run stops
                    let permitted = permit_rx
                        .lock()
                        .map(|permits| permits.recv().is_ok())
                        .unwrap_or(false);
                    if !permitted || worker_cancel.is_cancelled() {
                        break;
                    }
                    let index = next_index.fetch_add(1, Ordering::SeqCst);
                    let Some(tile) = grid.get(index) else {
                        break;
                    };
                    let outcome = fetch_with_retry(
                        fetcher,
                        tile,
                        step,
                        config.default_value,
                        &config.retry_policy,
                        worker_cancel,
                    );
                    if tx.send((index, outcome)).is_err() {
                        break;
                    }
                });
            }
            drop(tx);

            // Place in sequence order regardless of arrival order
            let mut permits = Some(permit_tx);
            let mut pending = BTreeMap::new();
            let mut next_to_place = 0;
            let mut result = Ok(());

            for (index, outcome) in rx {
                if result.is_err() {
                    continue;
                }
                pending.insert(index, outcome);

                while let Some(outcome) = pending.remove(&next_to_place) {
                    let Some(tile) = grid.get(next_to_place) else {
                        break;
                    };
                    if let Err(e) = self.handle_outcome(grid, tile, outcome, model, state) {
                        worker_cancel.cancel();
                        permits = None;
                        result = Err(e);
                        break;
                    }
                    next_to_place += 1;
                    if let Some(permits) = &permits {
                        let _ = permits.send(());
                    }
                }

                if next_to_place == grid.len() {
                    permits = None;
                }
            }

            // Workers stop taking tiles once cancelled, so some may never arrive
            if result.is_ok() && next_to_place < grid.len() {
                result = Err(AssemblyError::Cancelled {
                    completed: state.completed.load(Ordering::SeqCst),
                    total: grid.len(),
                });
            }
            result
        })
    }

    /// Applies one tile outcome to the raster and report.
    fn handle_outcome(
        &self,
        grid: &TileGrid,
        tile: &Tile,
        outcome: TileOutcome,
        model: &ResolutionModel,
        state: &mut AssemblyState,
    ) -> Result<(), AssemblyError> {
        match outcome {
            TileOutcome::Cancelled => {
                warn!(tile = tile.index(), "Assembly cancelled");
                return Err(AssemblyError::Cancelled {
                    completed: state.completed.load(Ordering::SeqCst),
                    total: grid.len(),
                });
            }
            TileOutcome::Fetched { data, attempts } if data.is_empty() => {
                state.report.retries += attempts.saturating_sub(1);
                warn!(
                    tile = tile.index(),
                    bounds = %tile.region(),
                    default_value = self.config.default_value,
                    "Tile returned no cells, filling with default value"
                );
                self.substitute(grid, tile, model, state);
            }
            TileOutcome::Fetched { data, attempts } => {
                state.report.retries += attempts.saturating_sub(1);
                if state.place(grid.parent(), tile, data, model) {
                    state.report.tiles_placed += 1;
                } else {
                    debug!(tile = tile.index(), bounds = %tile.region(), "Tile outside raster, skipped");
                    state.report.tiles_outside += 1;
                }
            }
            TileOutcome::Failed {
                error: FetchError::OutOfCoverage,
                attempts,
            } => {
                state.report.retries += attempts.saturating_sub(1);
                warn!(
                    tile = tile.index(),
                    bounds = %tile.region(),
                    default_value = self.config.default_value,
                    "No data for tile, filling with default value"
                );
                self.substitute(grid, tile, model, state);
            }
            TileOutcome::Failed { error, attempts } => {
                state.report.retries += attempts.saturating_sub(1);
                match self.config.failure_policy {
                    FailurePolicy::Abort => {
                        return Err(AssemblyError::TileFetch {
                            index: tile.index(),
                            bounds: *tile.region(),
                            attempts,
                            source: error,
                        });
                    }
                    FailurePolicy::SkipTile => {
                        warn!(
                            tile = tile.index(),
                            bounds = %tile.region(),
                            attempts,
                            error = %error,
                            "Tile failed, leaving default value"
                        );
                        state.report.failures.push(TileFailure {
                            index: tile.index(),
                            bounds: *tile.region(),
                            attempts,
                            error,
                        });
                    }
                }
            }
        }

        let completed = state.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(callback) = &self.progress {
            callback(AssemblyProgress {
                completed,
                total: grid.len(),
                tile_index: tile.index(),
            });
        }
        Ok(())
    }

    /// Writes a default-filled block over `tile`.
    fn substitute(
        &self,
        grid: &TileGrid,
        tile: &Tile,
        model: &ResolutionModel,
        state: &mut AssemblyState,
    ) {
        let fill = TileData::filled(
            model.pixel_dimensions(tile.region()),
            self.config.default_value,
        );
        state.place(grid.parent(), tile, fill, model);
        state.report.tiles_substituted += 1;
    }
}

/// Mutable state owned by the assembly loop.
struct AssemblyState {
    raster: RasterBuffer,
    report: AssemblyReport,
    completed: AtomicUsize,
}

impl AssemblyState {
    /// Copies `data` into the raster. Returns false if nothing was written.
    fn place(&mut self, parent: &Region, tile: &Tile, data: TileData, model: &ResolutionModel) -> bool {
        let expected = model.pixel_dimensions(tile.region());
        let received = data.dimensions();
        let data = data.truncated(expected);

        let Some(window) = insert_window(
            parent,
            tile.region(),
            model,
            self.raster.dimensions(),
            data.dimensions(),
        ) else {
            return false;
        };

        self.raster
            .copy_window(&data, window.row, window.col, window.rows, window.cols);
        debug!(
            tile = tile.index(),
            row = window.row,
            col = window.col,
            rows = window.rows,
            cols = window.cols,
            expected = %expected,
            received = %received,
            "Placed tile"
        );
        true
    }
}

/// Fetches one tile, retrying transient errors per `retry`.
fn fetch_with_retry(
    fetcher: &dyn TileFetcher,
    tile: &Tile,
    step_degrees: f64,
    default_value: ClassCode,
    retry: &RetryPolicy,
    cancel: &CancellationToken,
) -> TileOutcome {
    let mut attempt = 1;
    loop {
        if cancel.is_cancelled() {
            return TileOutcome::Cancelled;
        }

        match fetcher.fetch(tile.region(), step_degrees, default_value) {
            Ok(data) => {
                return TileOutcome::Fetched {
                    data,
                    attempts: attempt,
                }
            }
            Err(error) if error.is_retryable() => match retry.delay_for_attempt(attempt) {
                Some(delay) => {
                    warn!(
                        tile = tile.index(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Tile fetch failed, retrying"
                    );
                    if !sleep_unless_cancelled(delay, cancel) {
                        return TileOutcome::Cancelled;
                    }
                    attempt += 1;
                }
                None => {
                    return TileOutcome::Failed {
                        error,
                        attempts: attempt,
                    }
                }
            },
            Err(error) => {
                return TileOutcome::Failed {
                    error,
                    attempts: attempt,
                }
            }
        }
    }
}

/// Sleeps for `delay` in short slices. Returns false if cancelled first.
fn sleep_unless_cancelled(delay: Duration, cancel: &CancellationToken) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        if cancel.is_cancelled() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(CANCEL_POLL_INTERVAL));
    }
}
