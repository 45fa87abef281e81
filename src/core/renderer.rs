use super::camera::Camera;
use super::canvas::Canvas;
use super::color::Color;
use super::common::Float;
use super::error::Error;
use super::progress_reporter::ProgressReporter;
use super::rng::Rng;
use super::world::World;
use crossbeam_channel::{bounded, unbounded};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Shared flag for cooperatively stopping a render. Workers check it
/// between rows; a render never stops mid-pixel.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Knobs for one render invocation.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Stochastic samples per pixel.
    pub sample_count: u32,
    /// Scatter recursion budget per sample.
    pub max_depth: u32,
    /// Apply sqrt gamma correction to the averaged pixel.
    pub gamma_correction: bool,
    /// Worker pool size; 0 uses the host's available parallelism.
    pub worker_count: usize,
    /// Base seed; each row derives its own stream from it.
    pub seed: u64,
    /// Suppress the progress bar.
    pub quiet: bool,
    /// Optional cooperative cancellation flag.
    pub cancel: Option<CancelToken>,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            sample_count: 16,
            max_depth: 8,
            gamma_correction: true,
            worker_count: 0,
            seed: 0,
            quiet: false,
            cancel: None,
        }
    }
}

/// Render the world through the camera into a fresh canvas.
///
/// Rows are the unit of work: a fixed pool of workers pulls row indices
/// from a shared queue and sends finished rows to this thread, which is the
/// sole writer of the canvas and indexes purely by row number. Pixel values
/// are therefore independent of completion order, and because every row
/// re-seeds its own random stream, they are independent of the worker count
/// too.
pub fn render(world: &World, camera: &Camera, config: &RenderConfig) -> Result<Canvas, Error> {
    // freeze every memoized bound before the first worker starts
    world.finalize();

    let workers = if config.worker_count == 0 {
        thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    } else {
        config.worker_count
    };
    info!(
        "rendering {}x{} at {} samples, depth {}, {} workers",
        camera.hsize, camera.vsize, config.sample_count, config.max_depth, workers
    );

    let (job_tx, job_rx) = bounded::<usize>(camera.vsize);
    for y in 0..camera.vsize {
        let _ = job_tx.send(y);
    }
    drop(job_tx);

    let (row_tx, row_rx) = unbounded::<(usize, Vec<Color>)>();
    let mut reporter = ProgressReporter::new(camera.vsize as u64, "Rendering", config.quiet);

    let mut canvas = Canvas::new(camera.hsize, camera.vsize);
    let mut rows_done = 0usize;

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let row_tx = row_tx.clone();
            let reporter = &reporter;
            scope.spawn(move || {
                while let Ok(y) = job_rx.recv() {
                    if config.cancel.as_ref().map_or(false, |c| c.is_cancelled()) {
                        break;
                    }
                    let row = render_row(world, camera, config, y);
                    if row_tx.send((y, row)).is_err() {
                        break;
                    }
                    reporter.update(1);
                }
            });
        }
        drop(row_tx);

        // sole writer of the canvas, keyed by row index
        while rows_done < camera.vsize {
            match row_rx.recv() {
                Ok((y, row)) => {
                    canvas.write_row(y, &row);
                    rows_done += 1;
                }
                Err(_) => break,
            }
        }
    });

    if rows_done < camera.vsize {
        info!("render cancelled after {} of {} rows", rows_done, camera.vsize);
        return Err(Error::RenderCancelled);
    }

    reporter.done();
    info!("render finished in {:.1}s", reporter.elapsed().as_secs_f64());
    Ok(canvas)
}

fn render_row(world: &World, camera: &Camera, config: &RenderConfig, y: usize) -> Vec<Color> {
    let mut rng = Rng::new(config.seed.wrapping_add(y as u64));
    let samples = config.sample_count.max(1);
    let mut row = Vec::with_capacity(camera.hsize);

    for x in 0..camera.hsize {
        let mut accumulated = Color::BLACK;
        for _ in 0..samples {
            let px = x as Float + rng.uniform_float();
            let py = y as Float + rng.uniform_float();
            let ray = camera.ray_for_pixel(px, py);
            accumulated += world.color_at(&ray, config.max_depth, &mut rng);
        }

        let mut color = accumulated * (1.0 / samples as Float);
        if !color.is_finite() {
            // contain the anomaly to this pixel; the batch carries on
            warn!("non-finite sample at pixel ({}, {}), writing black", x, y);
            color = Color::BLACK;
        }
        if config.gamma_correction {
            color = Color::new(
                color.r.max(0.0).sqrt(),
                color.g.max(0.0).sqrt(),
                color.b.max(0.0).sqrt(),
            );
        }
        row.push(color);
    }
    row
}
