//! Wires the validated settings into the frame pipeline: shader loading, the
//! wgpu renderer, the noise-driven animation driver, the PNG writer and the
//! stdout progress reporter.
//!
//! Functions:
//!
//! - `run` drives one complete sequence.
//! - `initialise_tracing` configures logging.

use std::io;
use std::time::Instant;

use animation::{
    run_sequence, AnimationDriver, FrameWriter, OpenSimplex2d, PngEncoder, ProgressReporter,
    ShaderError, ShaderSources,
};
use anyhow::{Context, Result};
use renderer::GpuRenderer;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::settings::Settings;

pub fn run(cli: Cli) -> Result<()> {
    let started = Instant::now();
    let settings = Settings::from_cli(cli).context("invalid render settings")?;
    tracing::info!(
        width = settings.size.0,
        height = settings.size.1,
        frames = settings.frames,
        seed = settings.seed,
        variant = %settings.variant,
        output = %settings.output.display(),
        "starting fractal sequence"
    );

    let sources = ShaderSources::load(&settings.vertex, &settings.fragment)?;
    tracing::debug!(
        vertex = %settings.vertex.display(),
        fragment = %settings.fragment.display(),
        "loaded shader sources"
    );

    let mut renderer = GpuRenderer::new(&settings.renderer_config())
        .context("failed to initialise the GPU renderer")?;

    let noise = OpenSimplex2d::new(settings.seed);
    let driver = AnimationDriver::new(noise, settings.frames, settings.time, settings.variant)
        .with_base(settings.base);
    let writer = FrameWriter::new(settings.output.clone(), PngEncoder);
    let mut reporter = ProgressReporter::new(io::stdout().lock());

    match run_sequence(
        &mut renderer,
        &sources,
        &driver,
        &writer,
        &mut reporter,
        started,
    ) {
        Ok(outcome) => {
            if let Some(last) = outcome.last_frame {
                tracing::debug!(path = %last.display(), "last frame written");
            }
            Ok(())
        }
        Err(err) => {
            if let Some(shader) = err.downcast_ref::<ShaderError>() {
                tracing::error!(log = shader.log(), "shader program build failed");
            }
            Err(err)
        }
    }
}

pub fn initialise_tracing() {
    let default_filter = "warn,juliaframes=info,renderer=info,animation=info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
