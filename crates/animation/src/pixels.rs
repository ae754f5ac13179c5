/// Bytes per RGBA8 sample.
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum PixelBufferError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA8")]
    Length {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// One frame of tightly packed RGBA8 pixels, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixelBufferError> {
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(PixelBufferError::Length {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Number of bytes a `width`×`height` RGBA8 frame occupies.
pub fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}
