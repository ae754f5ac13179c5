//! The frame-sequence pipeline.
//!
//! ```text
//!   compile ─▶ link ─▶ surface uniforms
//!                           │
//!   for i in 1..=N ─────────┘
//!     driver.frame(i) ─▶ set_frame_uniforms ─▶ draw ─▶ read_pixels
//!                                                         │
//!     FrameImage::from_pixels ◀──────────────────────────┘
//!             │
//!             └─▶ FrameWriter::save ─▶ <output>/<iiii>.png
//! ```
//!
//! Frames run strictly one after another; only one frame's pixels are alive at
//! a time.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::driver::AnimationDriver;
use crate::encode::{FrameImage, ImageEncoder};
use crate::graphics::{compile_stages, GraphicsContext, ShaderSources};
use crate::noise::NoiseSource;
use crate::params::{FrameUniforms, SurfaceUniforms};
use crate::persist::FrameWriter;
use crate::report::{ProgressReporter, Stage};

/// What a completed run produced.
#[derive(Clone, Debug)]
pub struct SequenceOutcome {
    /// Path of the final frame written, `None` for an empty driver.
    pub last_frame: Option<PathBuf>,
}

/// Builds the shader program and renders every frame of `driver` to disk.
///
/// `started` is the wall-clock origin of the run used for the final summary.
pub fn run_sequence<G, N, E, W>(
    graphics: &mut G,
    sources: &ShaderSources,
    driver: &AnimationDriver<N>,
    writer: &FrameWriter<E>,
    reporter: &mut ProgressReporter<W>,
    started: Instant,
) -> Result<SequenceOutcome>
where
    G: GraphicsContext + ?Sized,
    N: NoiseSource,
    E: ImageEncoder,
    W: Write,
{
    prepare_program(graphics, sources, reporter)?;
    writer.prepare()?;

    let total = driver.frames();
    let mut last_frame = None;
    for index in 1..=total {
        last_frame = Some(render_frame(graphics, driver, writer, reporter, index)?);
    }

    let elapsed = started.elapsed();
    reporter.summary(elapsed, total)?;
    tracing::info!(
        frames = total,
        output = %writer.output_dir().display(),
        "sequence complete"
    );

    Ok(SequenceOutcome { last_frame })
}

/// Compiles and links the shaders, then pushes the surface uniforms.
pub fn prepare_program<G, W>(
    graphics: &mut G,
    sources: &ShaderSources,
    reporter: &mut ProgressReporter<W>,
) -> Result<()>
where
    G: GraphicsContext + ?Sized,
    W: Write,
{
    let timer = reporter.start(Stage::Compile)?;
    let compiled = compile_stages(graphics, sources);
    reporter.finish(timer)?;
    compiled?;

    let timer = reporter.start(Stage::Link)?;
    let linked = graphics.link_program();
    reporter.finish(timer)?;
    linked?;

    let (width, height) = graphics.size();
    graphics.set_surface_uniforms(SurfaceUniforms::new(width, height));
    Ok(())
}

fn render_frame<G, N, E, W>(
    graphics: &mut G,
    driver: &AnimationDriver<N>,
    writer: &FrameWriter<E>,
    reporter: &mut ProgressReporter<W>,
    index: u32,
) -> Result<PathBuf>
where
    G: GraphicsContext + ?Sized,
    N: NoiseSource,
    E: ImageEncoder,
    W: Write,
{
    let total = driver.frames();
    reporter.frame(index, total)?;

    let params = driver.frame(index);
    graphics.set_frame_uniforms(&FrameUniforms::from(&params));
    tracing::debug!(
        frame = index,
        time = driver.time_at(index),
        c = ?params.c,
        "frame parameters"
    );

    let timer = reporter.start(Stage::DrawAndRead)?;
    graphics
        .draw()
        .with_context(|| format!("frame {index}/{total}: draw failed"))?;
    let pixels = graphics
        .read_pixels()
        .with_context(|| format!("frame {index}/{total}: pixel readback failed"))?;
    reporter.finish(timer)?;

    let timer = reporter.start(Stage::Copy)?;
    let image = FrameImage::from_pixels(&pixels)
        .with_context(|| format!("frame {index}/{total}: copying pixels into image failed"))?;
    drop(pixels);
    reporter.finish(timer)?;

    let timer = reporter.start(Stage::Save)?;
    let path = writer.save(index, &image).with_context(|| {
        format!(
            "frame {index}/{total}: saving {} failed",
            writer.path_for(index).display()
        )
    })?;
    reporter.finish(timer)?;

    Ok(path)
}
