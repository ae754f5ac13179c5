use animation::{FrameUniforms, SurfaceUniforms};
use bytemuck::{Pod, Zeroable};

/// CPU mirror of the `JuliaParams` std140 block declared in `compile.rs`.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct JuliaUniforms {
    pub c: [f32; 4],
    pub cam_pos: [f32; 3],
    pub width: f32,
    pub height: f32,
    pub ar: f32,
    pub aa_level: i32,
    pub rotation: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub _padding: [f32; 2],
}

unsafe impl Zeroable for JuliaUniforms {}
unsafe impl Pod for JuliaUniforms {}

impl JuliaUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        let mut uniforms = Self::zeroed();
        uniforms.set_surface(SurfaceUniforms::new(width, height));
        uniforms
    }

    pub fn set_surface(&mut self, surface: SurfaceUniforms) {
        self.width = surface.width;
        self.height = surface.height;
        self.ar = surface.aspect_ratio;
    }

    /// Overwrites every per-frame member; nothing from the previous frame survives.
    pub fn set_frame(&mut self, frame: &FrameUniforms) {
        self.aa_level = frame.aa_level;
        self.rotation = frame.rotation;
        self.c = frame.c;
        self.cam_pos = frame.cam_pos;
        self.yaw = frame.yaw;
        self.pitch = frame.pitch;
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{align_of, size_of};

    use animation::FrameParams;

    use super::*;

    /// Sanity-checks that the CPU mirror of the uniform block matches the
    /// std140 offsets of the GLSL declaration.
    #[test]
    fn julia_uniforms_follow_std140_layout() {
        let uniforms = JuliaUniforms::new(2560, 1440);
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<JuliaUniforms>(), 16);
        assert_eq!(size_of::<JuliaUniforms>(), 64);
        assert_eq!((&uniforms.c as *const _ as usize) - base, 0);
        assert_eq!((&uniforms.cam_pos as *const _ as usize) - base, 16);
        assert_eq!((&uniforms.width as *const _ as usize) - base, 28);
        assert_eq!((&uniforms.height as *const _ as usize) - base, 32);
        assert_eq!((&uniforms.ar as *const _ as usize) - base, 36);
        assert_eq!((&uniforms.aa_level as *const _ as usize) - base, 40);
        assert_eq!((&uniforms.rotation as *const _ as usize) - base, 44);
        assert_eq!((&uniforms.yaw as *const _ as usize) - base, 48);
        assert_eq!((&uniforms.pitch as *const _ as usize) - base, 52);
        assert_eq!((&uniforms._padding as *const _ as usize) - base, 56);
    }

    #[test]
    fn frame_update_keeps_surface_values() {
        let mut uniforms = JuliaUniforms::new(2560, 1440);
        let frame = FrameUniforms::from(&FrameParams::default());
        uniforms.set_frame(&frame);

        assert_eq!(uniforms.width, 2560.0);
        assert_eq!(uniforms.height, 1440.0);
        assert_eq!(uniforms.aa_level, 1);
        assert_eq!(uniforms.c, [-0.1, -0.5, -0.2, 0.0]);
        assert_eq!(uniforms.cam_pos, [0.0, -5.0, -2.0]);
        assert_eq!(uniforms.yaw, frame.yaw);

        let bytes = bytemuck::bytes_of(&uniforms);
        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[28..32], &2560.0f32.to_ne_bytes());
    }
}
