use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use mandelzoom_core::{evaluate, Escape, ScreenPoint, ViewState};

use crate::error::RenderError;
use crate::frame::PixelBuffer;
use crate::grid::EscapeGrid;
use crate::palette::{ColorMapper, ColorScheme, HistogramEqualized, Monochrome, Smooth};

/// The parallel raster scheduler.
///
/// Owns a fixed worker pool sized once at construction (hardware
/// concurrency unless overridden) and the frame dimensions. A frame is a
/// fan-out/fan-in: the screen height is split into `worker_count`
/// contiguous row bands of `height / worker_count` rows, one task per band
/// writing its disjoint slab of the output; after the join the calling
/// thread computes the `height % worker_count` leftover rows itself. There
/// is no cancellation — a started frame runs to completion.
pub struct Renderer {
    width: u32,
    height: u32,
    workers: usize,
    pool: rayon::ThreadPool,
}

impl Renderer {
    /// Build the renderer and its worker pool.
    ///
    /// `worker_override` of `None` sizes the pool to available hardware
    /// parallelism. Pool construction failure is returned for the caller
    /// to treat as fatal; there is no degraded single-threaded fallback.
    pub fn new(width: u32, height: u32, worker_override: Option<usize>) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let workers = match worker_override {
            Some(0) => return Err(RenderError::InvalidWorkerCount(0)),
            Some(n) => n,
            None => num_cpus::get().max(1),
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("mandelzoom-worker-{i}"))
            .build()
            .map_err(|e| RenderError::WorkerPool(e.to_string()))?;

        info!(width, height, workers, "renderer ready");
        Ok(Self {
            width,
            height,
            workers,
            pool,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Run the escape-time pass for every pixel of the frame.
    ///
    /// The view is read-only for the whole pass; callers must not mutate
    /// it concurrently (the engine serializes commits against frames).
    pub fn compute_grid(&self, view: &ViewState, threshold: u32) -> EscapeGrid {
        let start = Instant::now();
        let width = self.width;
        let w = width as usize;
        let h = self.height as usize;
        let mut grid = EscapeGrid::new(self.width, self.height, threshold);

        let band_rows = h / self.workers;
        if band_rows > 0 {
            let slab_len = band_rows * w;
            let body = &mut grid.data[..slab_len * self.workers];
            self.pool.install(|| {
                body.par_chunks_mut(slab_len)
                    .enumerate()
                    .for_each(|(band, slab)| {
                        let y_start = (band * band_rows) as u32;
                        compute_rows(view, threshold, width, y_start, slab);
                    });
            });
        }

        // Rows that didn't divide evenly are finished on the calling thread.
        let leftover_start = band_rows * self.workers;
        if leftover_start < h {
            compute_rows(
                view,
                threshold,
                width,
                leftover_start as u32,
                &mut grid.data[leftover_start * w..],
            );
        }

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            threshold,
            bands = self.workers,
            leftover_rows = h - leftover_start,
            "escape pass complete"
        );
        grid
    }

    /// Color a computed grid into a fresh pixel buffer.
    pub fn colorize<M: ColorMapper + Sync>(&self, grid: &EscapeGrid, mapper: &M) -> PixelBuffer {
        let mut frame = PixelBuffer::new(grid.width, grid.height);
        let threshold = grid.threshold;
        self.pool.install(|| {
            frame
                .pixels
                .par_chunks_mut(4)
                .zip(grid.data.par_iter())
                .for_each(|(px, &e)| {
                    let [r, g, b] = mapper.shade(e, threshold);
                    px[0] = r;
                    px[1] = g;
                    px[2] = b;
                    px[3] = 255;
                });
        });
        frame
    }

    /// Render one full frame: escape pass, mapper setup, color pass.
    ///
    /// Histogram equalization needs the whole frame's iteration counts
    /// before it can color anything, which is why the passes are split.
    pub fn render_frame(
        &self,
        view: &ViewState,
        scheme: &ColorScheme,
        threshold: u32,
    ) -> PixelBuffer {
        let start = Instant::now();
        let grid = self.compute_grid(view, threshold);
        let frame = match scheme {
            ColorScheme::Monochrome => self.colorize(&grid, &Monochrome),
            ColorScheme::Smooth(kind) => {
                let palette = kind.build();
                self.colorize(&grid, &Smooth { palette: &palette })
            }
            ColorScheme::Histogram(kind) => {
                let palette = kind.build();
                let mapper = HistogramEqualized::build(&grid, &palette);
                self.colorize(&grid, &mapper)
            }
        };
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            width = self.width,
            height = self.height,
            scheme = %scheme.label(),
            "frame complete"
        );
        frame
    }
}

/// Evaluate `out.len() / width` full rows starting at `y_start`.
fn compute_rows(view: &ViewState, threshold: u32, width: u32, y_start: u32, out: &mut [Escape]) {
    debug_assert_eq!(out.len() % width as usize, 0);
    let rows = out.len() / width as usize;
    for row in 0..rows {
        let y = y_start + row as u32;
        let line = &mut out[row * width as usize..(row + 1) * width as usize];
        for (x, slot) in line.iter_mut().enumerate() {
            let c = view.to_complex(ScreenPoint::new(x as f64, y as f64));
            *slot = evaluate(c, threshold);
        }
    }
}
