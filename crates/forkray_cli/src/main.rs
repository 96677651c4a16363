use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use forkray_core::{ApertureShape, RenderConfig};
use forkray_renderer::{render, ScenePreset};

/// Render one of the built-in scenes to a PNG file.
///
/// Settings come from the built-in defaults, then the optional JSON
/// config file, then the flags given here.
#[derive(Debug, Parser)]
#[command(name = "forkray", author, version, about)]
struct Args {
    /// Image width in pixels
    #[arg(short, long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    samples: Option<u32>,

    /// Deepest recursion level that is still shaded
    #[arg(short = 'l', long)]
    max_depth: Option<u32>,

    /// Number of worker threads
    #[arg(short, long)]
    threads: Option<usize>,

    /// Number of timed render passes
    #[arg(short = 'b', long)]
    runs: Option<u32>,

    /// Output PNG path
    #[arg(short, long, default_value = "out.png")]
    output: PathBuf,

    /// Lens size for depth of field; 0 disables it
    #[arg(long)]
    aperture: Option<f64>,

    #[arg(long, value_enum)]
    aperture_shape: Option<ShapeArg>,

    /// Base seed as four comma-separated integers
    #[arg(long, value_parser = parse_seed)]
    seed: Option<[u64; 4]>,

    /// Scene to render: spheres, gallery or still-life
    #[arg(long, default_value = "spheres")]
    scene: ScenePreset,

    /// JSON render configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the checksum of the 8-bit image
    #[arg(long)]
    checksum: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ShapeArg {
    Disc,
    Rectangle,
}

impl From<ShapeArg> for ApertureShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Disc => ApertureShape::Disc,
            ShapeArg::Rectangle => ApertureShape::Rectangle,
        }
    }
}

fn parse_seed(s: &str) -> Result<[u64; 4], String> {
    let words = s
        .split(',')
        .map(|w| w.trim().parse::<u64>().map_err(|e| format!("'{}': {}", w.trim(), e)))
        .collect::<Result<Vec<_>, _>>()?;
    <[u64; 4]>::try_from(words)
        .map_err(|words| format!("expected 4 comma-separated integers, got {}", words.len()))
}

impl Args {
    /// Defaults, overridden by the config file, overridden by flags.
    fn resolve_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(runs) = self.runs {
            config.runs = runs;
        }
        if let Some(aperture) = self.aperture {
            config.aperture = aperture;
        }
        if let Some(shape) = self.aperture_shape {
            config.aperture_shape = shape.into();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        config.validate().context("Invalid render settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || {
            log::warn!("Interrupted, stopping workers");
            cancel.store(true, Ordering::Relaxed);
        })
        .context("Failed to install interrupt handler")?;
    }

    let (scene, camera) = args.scene.build();
    log::info!("Scene '{}' with {} primitives", args.scene, scene.len());

    let out = render(&scene, &camera, &config, &cancel).context("Render failed")?;

    if out.timings.len() > 1 {
        let total: Duration = out.timings.iter().sum();
        let best = out.timings.iter().min().copied().unwrap_or_default();
        log::info!(
            "{} runs: best {:.3}s, mean {:.3}s",
            out.timings.len(),
            best.as_secs_f64(),
            total.as_secs_f64() / out.timings.len() as f64
        );
    }

    if !out.completed {
        log::warn!("Render was cancelled; writing partial image");
    }
    out.image
        .save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if args.checksum {
        println!("{:016x}", out.image.checksum());
    }

    Ok(())
}
