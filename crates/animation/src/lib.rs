//! Frame-sequence core for the animated fractal renderer.
//!
//! Everything that does not touch the GPU lives here: the seeded noise field,
//! the animation driver that turns a frame index into shader parameters, the
//! PNG persister, console reporting, and the pipeline that strings them
//! together over any [`GraphicsContext`]. The `renderer` crate supplies the wgpu
//! implementation of that trait.

mod driver;
mod duration;
mod encode;
mod graphics;
mod noise;
mod params;
mod persist;
mod pixels;
mod report;
mod sequence;

pub use driver::{
    AnimationDriver, FractalVariant, TimeRange, DEFAULT_TIME_SPAN, DEFAULT_TIME_START,
};
pub use duration::format_duration;
pub use encode::{EncodeError, FrameImage, ImageEncoder, PngEncoder};
pub use graphics::{
    GraphicsContext, ShaderError, ShaderSources, ShaderStage, POSITION_ATTRIBUTE,
};
pub use noise::{NoiseSource, OpenSimplex2d};
pub use params::{
    FrameParams, FrameUniforms, SurfaceUniforms, DEFAULT_AA_LEVEL, DEFAULT_CAM_POS, DEFAULT_C,
    DEFAULT_ROTATION,
};
pub use persist::{frame_file_name, FrameWriter, PersistError, FRAME_NUMBER_WIDTH, MAX_FRAMES};
pub use pixels::{byte_len, PixelBuffer, PixelBufferError, BYTES_PER_PIXEL};
pub use report::{summary_line, ProgressReporter, Stage, StageTimer};
pub use sequence::{prepare_program, run_sequence, SequenceOutcome};

/// Seed of the noise field used when none is given.
pub const DEFAULT_SEED: u32 = 6666;
/// Number of frames rendered when none is given.
pub const DEFAULT_FRAMES: u32 = 1200;
/// Render target width in pixels.
pub const DEFAULT_WIDTH: u32 = 2560;
/// Render target height in pixels.
pub const DEFAULT_HEIGHT: u32 = 1440;
