//! GPU side of the frame pipeline.
//!
//! - `context` owns the wgpu instance/device and the off-screen color target.
//! - `pipeline` links compiled stages into a render pipeline and uploads the
//!   full-screen quad.
//! - `uniforms` mirrors the injected `JuliaParams` block and is rewritten
//!   through the queue whenever a value changes.
//! - `readback` copies the color target into a mappable buffer and strips row
//!   padding.
//! - `state` glues everything together as the `GpuRenderer` used by the
//!   frame pipeline.

mod context;
mod pipeline;
mod readback;
mod state;
mod uniforms;

pub use state::GpuRenderer;
