//! sdtrace CLI - render CSG signed-distance scenes

mod scene_file;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sdtrace_core::prelude::*;
use sdtrace_render::{GpuTracer, init_headless};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sdtrace")]
#[command(about = "Sphere tracing of CSG signed-distance scenes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene file to an image
    Render {
        /// Scene description file
        scene: PathBuf,

        /// Output image file (format from extension)
        #[arg(short, long, default_value = "render.png")]
        output: PathBuf,

        /// Backend to render with
        #[arg(short, long, value_enum, default_value_t = Backend::Parallel)]
        backend: Backend,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Report how a scene flattens for the compute backend
    Inspect {
        /// Scene description file
        scene: PathBuf,
    },

    /// Print the effective render settings as JSON
    Settings {
        #[command(flatten)]
        overrides: Overrides,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// One thread
    Cpu,
    /// Rayon worker pool
    Parallel,
    /// wgpu compute kernel
    Gpu,
    /// Every backend, one image each
    All,
}

impl Backend {
    fn name(self) -> &'static str {
        match self {
            Backend::Cpu => "cpu",
            Backend::Parallel => "parallel",
            Backend::Gpu => "gpu",
            Backend::All => "all",
        }
    }
}

/// Settings sources, lowest to highest priority: defaults, config file, flags
#[derive(clap::Args)]
struct Overrides {
    /// Settings file (defaults to {config_dir}/sdtrace/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image width
    #[arg(long)]
    width: Option<u32>,

    /// Image height
    #[arg(long)]
    height: Option<u32>,

    /// Antialiasing grid size (N x N samples per pixel)
    #[arg(long)]
    aa: Option<u32>,

    /// Worker threads for the parallel backend (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,
}

impl Overrides {
    fn resolve(&self) -> Result<RenderSettings> {
        let path = self.config.clone().or_else(|| {
            dirs::config_dir()
                .map(|p| p.join("sdtrace").join("settings.json"))
                .filter(|p| p.exists())
        });

        let mut settings = match path {
            Some(path) => {
                if !path.exists() {
                    warn!("Settings file {} not found, using defaults", path.display());
                }
                RenderSettings::load_or_default(&path)
            }
            None => RenderSettings::default(),
        };

        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(aa) = self.aa {
            settings.antialiasing = aa;
        }
        if let Some(threads) = self.threads {
            settings.threads = threads;
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            scene,
            output,
            backend,
            overrides,
        } => {
            let settings = overrides.resolve()?;
            run_render(&scene, &output, backend, &settings)?;
        }
        Commands::Inspect { scene } => {
            run_inspect(&scene);
        }
        Commands::Settings { overrides } => {
            let settings = overrides.resolve()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn run_render(scene: &Path, output: &Path, backend: Backend, settings: &RenderSettings) -> Result<()> {
    let scene = scene_file::load(scene);
    info!(
        "Rendering {}x{} with {} backend",
        settings.width,
        settings.height,
        backend.name()
    );

    if backend != Backend::All {
        let frame = render_with(backend, &scene, settings)?;
        save(&frame, output, settings)?;
        return Ok(());
    }

    let mut frames = Vec::new();
    for backend in [Backend::Cpu, Backend::Parallel, Backend::Gpu] {
        let frame = render_with(backend, &scene, settings)?;
        save(&frame, &suffixed(output, backend.name()), settings)?;
        frames.push((backend, frame));
    }

    if let [(_, reference), rest @ ..] = frames.as_slice() {
        for (backend, frame) in rest {
            if let Some(diff) = reference.max_difference(frame) {
                info!(max_difference = diff, "cpu vs {}", backend.name());
            }
        }
    }
    Ok(())
}

fn render_with(backend: Backend, scene: &Scene, settings: &RenderSettings) -> Result<Frame> {
    let start = Instant::now();
    let ctx = RenderContext::new(scene, settings);

    let frame = match backend {
        Backend::Cpu => render_sequential(&ctx),
        Backend::Parallel => render_parallel(&ctx)?,
        Backend::Gpu => {
            let (device, queue) =
                pollster::block_on(init_headless()).context("GPU initialization failed")?;
            let tracer = GpuTracer::new(device, queue);
            tracer.render_scene(scene, settings)?
        }
        Backend::All => anyhow::bail!("`all` is not a single backend"),
    };

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "{} render finished",
        backend.name()
    );
    Ok(frame)
}

fn save(frame: &Frame, output: &Path, settings: &RenderSettings) -> Result<()> {
    frame
        .save(output, settings.gamma)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Saved to: {}", output.display());
    Ok(())
}

/// `render.png` + `gpu` -> `render-gpu.png`
fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{suffix}"),
    };
    path.with_file_name(name)
}

fn run_inspect(scene: &Path) {
    let scene = scene_file::load(scene);
    println!("Lights:  {}", scene.lights().len());
    println!("Bodies:  {}", scene.root().leaf_count());

    match sdtrace_sdf::pack(scene.root()) {
        Ok(packed) => {
            println!(
                "Segments: {} / {}",
                packed.segment_count(),
                sdtrace_sdf::MAX_SEGMENTS
            );
            for kind in sdtrace_sdf::PrimitiveType::ALL {
                println!(
                    "{:<8} {} / {}",
                    format!("{kind}:"),
                    packed.body_count(kind),
                    sdtrace_sdf::MAX_BODIES_PER_TYPE
                );
            }
        }
        Err(e) => println!("GPU backend: {e}"),
    }
}
