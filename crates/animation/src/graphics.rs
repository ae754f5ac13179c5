use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

use crate::params::{FrameUniforms, SurfaceUniforms};
use crate::pixels::PixelBuffer;

/// Vertex attribute carrying the full-screen quad positions.
pub const POSITION_ATTRIBUTE: &str = "a_pos";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Outcome of building the shader program; every failure carries the
/// compiler or linker diagnostic text.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("failed to link shader program:\n{log}")]
    Link { log: String },
    #[error("shader program has no vertex attribute named '{name}'")]
    MissingAttribute { name: String },
}

impl ShaderError {
    /// Diagnostic text reported by the shader toolchain.
    pub fn log(&self) -> &str {
        match self {
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => log,
            ShaderError::MissingAttribute { name } => name,
        }
    }
}

/// Source text for the two programmable stages.
#[derive(Clone, Debug)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn load(vertex: &Path, fragment: &Path) -> Result<Self> {
        Ok(Self {
            vertex: read_source(vertex)?,
            fragment: read_source(fragment)?,
        })
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read shader at {}", path.display()))
}

/// GPU capabilities the frame pipeline relies on.
///
/// Implementations own a fixed-size off-screen color target. Calls arrive in a
/// strict order: both stages are compiled, the program is linked, surface
/// uniforms are pushed once, then every frame pushes its uniforms, draws and
/// reads back.
pub trait GraphicsContext {
    /// Render target size in pixels.
    fn size(&self) -> (u32, u32);

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<(), ShaderError>;

    /// Links the compiled stages and binds the full-screen quad to [`POSITION_ATTRIBUTE`].
    fn link_program(&mut self) -> Result<(), ShaderError>;

    fn set_surface_uniforms(&mut self, uniforms: SurfaceUniforms);

    fn set_frame_uniforms(&mut self, uniforms: &FrameUniforms);

    /// Issues one draw call covering the full-screen quad.
    fn draw(&mut self) -> Result<()>;

    /// Blocks until the whole color target is copied back as RGBA8, bottom
    /// row first.
    fn read_pixels(&mut self) -> Result<PixelBuffer>;
}

/// Compiles both stages, stopping at the first failure.
pub(crate) fn compile_stages<G: GraphicsContext + ?Sized>(
    graphics: &mut G,
    sources: &ShaderSources,
) -> Result<(), ShaderError> {
    graphics.compile_stage(ShaderStage::Vertex, &sources.vertex)?;
    graphics.compile_stage(ShaderStage::Fragment, &sources.fragment)
}
