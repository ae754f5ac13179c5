//! Headless wgpu renderer for the fractal frame sequence.
//!
//! The crate implements [`animation::GraphicsContext`] on top of an
//! off-screen `wgpu` color target. The overall flow is:
//!
//! ```text
//!   GLSL sources ──▶ compile::wrap_shader ──▶ naga / wgpu modules
//!                                                   │ link
//!                                                   ▼
//!   FrameUniforms ──▶ JuliaParams UBO ──▶ render pipeline ──▶ quad draw
//!                                                                 │
//!                                         PixelBuffer ◀── readback┘
//! ```
//!
//! Shader sources are written in the WebGL dialect (loose uniforms,
//! `attribute`/`varying`, `gl_FragColor`) and are rewritten at runtime so the
//! Vulkan GLSL frontend accepts them.

mod compile;
mod gpu;
mod types;

pub use gpu::GpuRenderer;
pub use types::{GpuPowerPreference, RendererConfig};
