//! Row-parallel renderer.
//!
//! Rows are handed out through a shared atomic counter to a fixed number
//! of workers running on a dedicated rayon pool. Every pixel draws from
//! its own RNG stream, forked from the base seed by row, column and
//! sample, so the image does not depend on how many threads rendered it
//! or in which order rows were claimed.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use forkray_core::{ConfigError, Image, ImageError, RenderConfig};
use forkray_math::{Rng, Vec3};
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;

use crate::{Camera, Color, Scene, SceneTracer, Tracer};

/// Errors that stop a render before it starts.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot allocate output buffer: {0}")]
    Image(#[from] ImageError),

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Result of [`render`].
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Linear RGB buffer of the last pass
    pub image: Image,
    /// False if the render was cancelled; `image` is then partial
    pub completed: bool,
    /// Wall time of every pass that was started
    pub timings: Vec<Duration>,
}

/// Mean radiance over `samples` jittered rays through pixel (x, y).
///
/// Sample `s` draws from `pixel_rng.fork(s)`.
pub fn render_pixel(
    tracer: &dyn Tracer,
    camera: &Camera,
    pixel_rng: &Rng,
    x: u32,
    y: u32,
    samples: u32,
) -> Color {
    let mut color = Color::ZERO;
    for s in 0..samples {
        let mut rng = pixel_rng.fork(s as u64);
        let ray = camera.get_ray(x, y, &mut rng);
        color += tracer.trace(&mut rng, &ray, 0);
    }
    color / samples as f64
}

/// Render row `y` into `row`, left to right.
///
/// `cancel` is polled before every pixel. Returns false if the row was
/// abandoned with pixels left unwritten.
pub fn render_row(
    tracer: &dyn Tracer,
    camera: &Camera,
    base: &Rng,
    y: u32,
    row: &mut [Vec3],
    samples: u32,
    cancel: &AtomicBool,
) -> bool {
    let row_rng = base.fork(y as u64);
    for (x, pixel) in row.iter_mut().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            return false;
        }
        let pixel_rng = row_rng.fork(x as u64);
        *pixel = render_pixel(tracer, camera, &pixel_rng, x as u32, y, samples);
    }
    true
}

/// Render `scene` through `camera`.
///
/// Resolution and aperture come from `config`, overriding whatever the
/// camera was built with. The configuration is validated before anything
/// is allocated. Setting `cancel` stops all workers after their current
/// pixel; the partial image is returned with `completed == false`.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<RenderOutput> {
    config.validate()?;

    let camera = camera
        .clone()
        .with_resolution(config.width, config.height)
        .with_aperture(config.aperture, config.aperture_shape);
    let mut image = Image::new(config.width, config.height)?;
    let pool = ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .thread_name(|i| format!("forkray-worker-{i}"))
        .build()?;

    let tracer = SceneTracer::new(scene, config.max_depth);
    let base = Rng::from_words(config.seed);

    log::info!(
        "Rendering {}x{}, {} spp, max depth {}, {} threads, {} primitives",
        config.width,
        config.height,
        config.samples,
        config.max_depth,
        config.threads,
        scene.len()
    );

    let mut timings = Vec::with_capacity(config.runs as usize);
    let mut completed = true;

    for run in 1..=config.runs {
        let start = Instant::now();
        completed = render_pass(&pool, &tracer, &camera, &base, config, &mut image, cancel);
        let elapsed = start.elapsed();
        timings.push(elapsed);

        if !completed {
            log::warn!(
                "Render cancelled during run {}/{} after {:.3}s",
                run,
                config.runs,
                elapsed.as_secs_f64()
            );
            break;
        }
        log::info!("Run {}/{} took {:.3}s", run, config.runs, elapsed.as_secs_f64());
    }

    Ok(RenderOutput {
        image,
        completed,
        timings,
    })
}

/// One full pass over the image. Returns true if every row was finished.
fn render_pass(
    pool: &ThreadPool,
    tracer: &SceneTracer<'_>,
    camera: &Camera,
    base: &Rng,
    config: &RenderConfig,
    image: &mut Image,
    cancel: &AtomicBool,
) -> bool {
    let height = image.height() as usize;
    // One slot per row so workers can write disjoint rows without unsafe.
    // A row index is claimed by exactly one worker through `next_row`, so
    // these locks are never contended; the counter is the only shared
    // mutable state.
    let rows: Vec<Mutex<&mut [Vec3]>> = image.rows_mut().map(Mutex::new).collect();
    let next_row = AtomicUsize::new(0);
    let finished_rows = AtomicUsize::new(0);

    pool.scope(|scope| {
        for worker in 0..config.threads {
            let rows = &rows;
            let next_row = &next_row;
            let finished_rows = &finished_rows;
            scope.spawn(move |_| {
                let mut rendered = 0usize;
                while !cancel.load(Ordering::Relaxed) {
                    let y = next_row.fetch_add(1, Ordering::AcqRel);
                    if y >= height {
                        break;
                    }
                    let mut row = rows[y].lock().unwrap_or_else(PoisonError::into_inner);
                    if !render_row(tracer, camera, base, y as u32, &mut **row, config.samples, cancel) {
                        break;
                    }
                    rendered += 1;
                }
                finished_rows.fetch_add(rendered, Ordering::AcqRel);
                log::debug!("Worker {worker} rendered {rendered} rows");
            });
        }
    });

    finished_rows.load(Ordering::Acquire) == height
}
