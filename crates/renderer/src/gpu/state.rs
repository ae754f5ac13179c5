use animation::{
    FrameUniforms, GraphicsContext, PixelBuffer, ShaderError, ShaderStage, SurfaceUniforms,
};
use anyhow::{anyhow, Context, Result};

use crate::compile::{compile_stage, CompiledStage};
use crate::types::RendererConfig;

use super::context::GpuContext;
use super::pipeline::{
    create_quad_buffer, link_program, PipelineLayouts, QUAD_VERTEX_COUNT,
};
use super::readback::ReadbackBuffer;
use super::uniforms::JuliaUniforms;

/// wgpu-backed [`GraphicsContext`] rendering into an off-screen target.
pub struct GpuRenderer {
    context: GpuContext,
    layouts: PipelineLayouts,
    quad: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: JuliaUniforms,
    readback: ReadbackBuffer,
    vertex: Option<CompiledStage>,
    fragment: Option<CompiledStage>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl GpuRenderer {
    pub fn new(config: &RendererConfig) -> Result<Self> {
        let (width, height) = config.size;
        let context = GpuContext::new(width, height, config.gpu_power)?;
        let device = &context.device;

        let layouts = PipelineLayouts::new(device);
        let quad = create_quad_buffer(device);
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<JuliaUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform bind group"),
            layout: &layouts.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let readback = ReadbackBuffer::new(device, width, height);

        Ok(Self {
            uniforms: JuliaUniforms::new(width, height),
            context,
            layouts,
            quad,
            uniform_buffer,
            uniform_bind_group,
            readback,
            vertex: None,
            fragment: None,
            pipeline: None,
        })
    }

    fn write_uniforms(&self) {
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );
    }
}

impl GraphicsContext for GpuRenderer {
    fn size(&self) -> (u32, u32) {
        (self.context.width, self.context.height)
    }

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<(), ShaderError> {
        let compiled = compile_stage(&self.context.device, stage, source)?;
        tracing::debug!(%stage, bytes = compiled.wrapped.source.len(), "compiled shader stage");
        match stage {
            ShaderStage::Vertex => self.vertex = Some(compiled),
            ShaderStage::Fragment => self.fragment = Some(compiled),
        }
        self.pipeline = None;
        Ok(())
    }

    fn link_program(&mut self) -> Result<(), ShaderError> {
        let (Some(vertex), Some(fragment)) = (self.vertex.as_ref(), self.fragment.as_ref()) else {
            return Err(ShaderError::Link {
                log: "both shader stages must compile before linking".to_string(),
            });
        };
        let pipeline = link_program(&self.context.device, &self.layouts, vertex, fragment)?;
        self.pipeline = Some(pipeline);
        Ok(())
    }

    fn set_surface_uniforms(&mut self, uniforms: SurfaceUniforms) {
        self.uniforms.set_surface(uniforms);
        self.write_uniforms();
    }

    fn set_frame_uniforms(&mut self, uniforms: &FrameUniforms) {
        self.uniforms.set_frame(uniforms);
        self.write_uniforms();
    }

    fn draw(&mut self) -> Result<()> {
        let pipeline = self
            .pipeline
            .as_ref()
            .ok_or_else(|| anyhow!("draw requested before the shader program was linked"))?;

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.context.target_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.quad.slice(..));
            render_pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
        }
        self.readback.encode_copy(&mut encoder, &self.context.target);
        self.context.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn read_pixels(&mut self) -> Result<PixelBuffer> {
        let bytes = self.readback.read(&self.context.device)?;
        PixelBuffer::new(self.context.width, self.context.height, bytes)
            .context("readback returned a frame of the wrong size")
    }
}
