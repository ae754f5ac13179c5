use std::f64::consts::{FRAC_PI_2, PI};

/// Anti-aliasing factor used when nothing else is requested.
pub const DEFAULT_AA_LEVEL: i32 = 1;
/// Fractal rotation in radians.
pub const DEFAULT_ROTATION: f64 = -0.52;
/// Fractal constant in effect before the first frame is computed.
pub const DEFAULT_C: [f64; 4] = [-0.1, -0.5, -0.2, 0.0];
/// Camera position; constant for a whole run.
pub const DEFAULT_CAM_POS: [f64; 3] = [0.0, -5.0, -2.0];

/// Scene parameters for one frame.
///
/// Values are produced fresh by the animation driver for every frame and never
/// mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    pub aa_level: i32,
    pub rotation: f64,
    pub c: [f64; 4],
    pub cam_pos: [f64; 3],
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            aa_level: DEFAULT_AA_LEVEL,
            rotation: DEFAULT_ROTATION,
            c: DEFAULT_C,
            cam_pos: DEFAULT_CAM_POS,
        }
    }
}

impl FrameParams {
    /// Camera yaw derived from the current position, folded into `[0, π)`.
    pub fn yaw(&self) -> f64 {
        let [x, y, z] = self.cam_pos;
        let yaw = ((x * x + y * y).sqrt() / z).atan();
        if yaw < 0.0 {
            yaw + PI
        } else {
            yaw
        }
    }

    /// Camera pitch derived from the current position.
    pub fn pitch(&self) -> f64 {
        let [x, y, _] = self.cam_pos;
        y.atan2(x) + FRAC_PI_2
    }
}

/// Per-frame shader inputs at the precision the GPU consumes them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub aa_level: i32,
    pub rotation: f32,
    pub c: [f32; 4],
    pub cam_pos: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
}

impl From<&FrameParams> for FrameUniforms {
    /// Angles are recomputed from `cam_pos` on every conversion.
    fn from(params: &FrameParams) -> Self {
        Self {
            aa_level: params.aa_level,
            rotation: params.rotation as f32,
            c: params.c.map(|value| value as f32),
            cam_pos: params.cam_pos.map(|value| value as f32),
            yaw: params.yaw() as f32,
            pitch: params.pitch() as f32,
        }
    }
}

/// Inputs fixed for the lifetime of the render surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceUniforms {
    pub width: f32,
    pub height: f32,
    pub aspect_ratio: f32,
}

impl SurfaceUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            aspect_ratio: (f64::from(width) / f64::from(height.max(1))) as f32,
        }
    }
}
