use std::path::PathBuf;

use animation::{
    FractalVariant, DEFAULT_AA_LEVEL, DEFAULT_FRAMES, DEFAULT_HEIGHT, DEFAULT_ROTATION,
    DEFAULT_SEED, DEFAULT_TIME_SPAN, DEFAULT_TIME_START, DEFAULT_WIDTH,
};
use clap::Parser;
use renderer::GpuPowerPreference;

#[derive(Parser, Debug)]
#[command(
    name = "juliaframes",
    author,
    version,
    about = "Render an animated 3D fractal to a numbered PNG sequence"
)]
pub struct Cli {
    /// Output width in pixels.
    #[arg(long, env = "JULIAFRAMES_WIDTH", default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Output height in pixels.
    #[arg(long, env = "JULIAFRAMES_HEIGHT", default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Number of frames to render (1-9999).
    #[arg(long, env = "JULIAFRAMES_FRAMES", default_value_t = DEFAULT_FRAMES)]
    pub frames: u32,

    /// Animation time of frame 0.
    #[arg(
        long,
        env = "JULIAFRAMES_TIME_START",
        value_name = "T",
        default_value_t = DEFAULT_TIME_START,
        allow_negative_numbers = true
    )]
    pub time_start: f64,

    /// Animation time covered by the whole sequence.
    #[arg(
        long,
        env = "JULIAFRAMES_TIME_SPAN",
        value_name = "T",
        default_value_t = DEFAULT_TIME_SPAN,
        allow_negative_numbers = true
    )]
    pub time_span: f64,

    /// Seed of the noise field driving the fractal constant.
    #[arg(long, env = "JULIAFRAMES_SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u32,

    /// Directory receiving `0001.png`, `0002.png`, ...
    #[arg(long, env = "JULIAFRAMES_OUTPUT", value_name = "DIR", default_value = "renders")]
    pub output: PathBuf,

    /// Vertex shader source (WebGL GLSL).
    #[arg(
        long,
        env = "JULIAFRAMES_VERTEX",
        value_name = "FILE",
        default_value = "shaders/julia.vert.glsl"
    )]
    pub vertex: PathBuf,

    /// Fragment shader source (WebGL GLSL).
    #[arg(
        long,
        env = "JULIAFRAMES_FRAGMENT",
        value_name = "FILE",
        default_value = "shaders/julia.frag.glsl"
    )]
    pub fragment: PathBuf,

    /// Mapping from noise to the fractal constant: `burning-ship` or `julia`.
    #[arg(
        long,
        env = "JULIAFRAMES_VARIANT",
        value_name = "VARIANT",
        default_value_t = FractalVariant::default()
    )]
    pub variant: FractalVariant,

    /// Anti-aliasing level passed to the fragment shader.
    #[arg(long, env = "JULIAFRAMES_AA_LEVEL", default_value_t = DEFAULT_AA_LEVEL)]
    pub aa_level: i32,

    /// Rotation passed to the fragment shader.
    #[arg(
        long,
        env = "JULIAFRAMES_ROTATION",
        default_value_t = DEFAULT_ROTATION,
        allow_negative_numbers = true
    )]
    pub rotation: f64,

    /// Camera position as `X,Y,Z`.
    #[arg(
        long,
        env = "JULIAFRAMES_CAM_POS",
        value_name = "X,Y,Z",
        value_parser = parse_cam_pos,
        default_value = "0,-5,-2",
        allow_hyphen_values = true
    )]
    pub cam_pos: [f64; 3],

    /// Adapter power preference: `low` or `high`.
    #[arg(
        long,
        env = "JULIAFRAMES_GPU_POWER",
        value_name = "low|high",
        default_value_t = GpuPowerPreference::default()
    )]
    pub gpu_power: GpuPowerPreference,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_cam_pos(value: &str) -> Result<[f64; 3], String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("camera position must not be empty".to_string());
    }

    let mut components = [0.0; 3];
    let mut parts = trimmed.split(',');
    for (axis, slot) in ["x", "y", "z"].into_iter().zip(components.iter_mut()) {
        let part = parts
            .next()
            .ok_or_else(|| format!("camera position is missing the {axis} component"))?;
        let parsed = part
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid {axis} component '{}'", part.trim()))?;
        if !parsed.is_finite() {
            return Err(format!("{axis} component must be finite"));
        }
        *slot = parsed;
    }
    if parts.next().is_some() {
        return Err("camera position takes exactly three components (X,Y,Z)".to_string());
    }
    Ok(components)
}
