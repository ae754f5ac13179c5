use anyhow::{anyhow, Context, Result};
use crossbeam_channel::bounded;

use animation::BYTES_PER_PIXEL;

/// Row pitch of the staging buffer, padded to wgpu's copy alignment.
pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL as u32;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Staging buffer the color target is copied into before mapping.
pub(crate) struct ReadbackBuffer {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
}

impl ReadbackBuffer {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let padded_bytes_per_row = padded_bytes_per_row(width);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback buffer"),
            size: u64::from(padded_bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            width,
            height,
            padded_bytes_per_row,
        }
    }

    pub fn encode_copy(&self, encoder: &mut wgpu::CommandEncoder, texture: &wgpu::Texture) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Maps the buffer, blocks until the GPU has finished, and returns tight
    /// rows bottom row first.
    pub fn read(&self, device: &wgpu::Device) -> Result<Vec<u8>> {
        let slice = self.buffer.slice(..);
        let (sender, receiver) = bounded(1);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        device
            .poll(wgpu::PollType::Wait)
            .context("failed waiting for the GPU to finish the frame")?;

        receiver
            .recv()
            .map_err(|_| anyhow!("GPU map callback was dropped"))?
            .context("GPU buffer mapping failed")?;

        let frame = {
            let mapped = slice.get_mapped_range();
            copy_tight_rows(
                &mapped,
                self.width * BYTES_PER_PIXEL as u32,
                self.padded_bytes_per_row,
                self.height,
            )
        };
        self.buffer.unmap();
        frame
    }
}

/// Strips the per-row alignment padding from a mapped copy and reverses the
/// row order.
///
/// The texture copy lands top row first; frames leave the renderer bottom row
/// first, the `glReadPixels` order, so row 0 of a written image is the row
/// where `gl_FragCoord.y` is `0.5`.
pub(crate) fn copy_tight_rows(
    mapped: &[u8],
    unpadded_bytes_per_row: u32,
    padded_bytes_per_row: u32,
    height: u32,
) -> Result<Vec<u8>> {
    let unpadded = unpadded_bytes_per_row as usize;
    let padded = padded_bytes_per_row as usize;
    let required = padded * height as usize;
    if mapped.len() < required {
        anyhow::bail!(
            "mapped frame too small: expected at least {required} bytes, got {}",
            mapped.len()
        );
    }

    let mut frame = Vec::with_capacity(unpadded * height as usize);
    for row in mapped[..required].chunks_exact(padded).rev() {
        frame.extend_from_slice(&row[..unpadded]);
    }
    Ok(frame)
}
