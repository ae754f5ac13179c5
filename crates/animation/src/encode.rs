use image::codecs::png::PngEncoder as ImagePngEncoder;
use image::{ExtendedColorType, ImageEncoder as _, RgbaImage};

use crate::pixels::PixelBuffer;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("image buffer of {width}x{height} does not match {len} pixel bytes")]
    Dimensions { width: u32, height: u32, len: usize },
    #[error("failed to encode PNG: {0}")]
    Png(#[from] image::ImageError),
}

/// Turns raw RGBA8 bytes into an encoded image file.
pub trait ImageEncoder {
    /// File extension written after the frame number.
    fn extension(&self) -> &'static str;

    fn encode(&self, rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError>;
}

impl<E: ImageEncoder + ?Sized> ImageEncoder for &E {
    fn extension(&self) -> &'static str {
        (**self).extension()
    }

    fn encode(&self, rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(rgba, width, height)
    }
}

/// Lossless RGBA8 PNG output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn encode(&self, rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
        // The underlying encoder panics on a length mismatch.
        if rgba.len() != crate::pixels::byte_len(width, height) {
            return Err(EncodeError::Dimensions {
                width,
                height,
                len: rgba.len(),
            });
        }
        let mut bytes = Vec::new();
        ImagePngEncoder::new(&mut bytes).write_image(
            rgba,
            width,
            height,
            ExtendedColorType::Rgba8,
        )?;
        Ok(bytes)
    }
}

/// CPU-side image surface a frame is copied into before encoding.
#[derive(Clone, Debug)]
pub struct FrameImage {
    image: RgbaImage,
}

impl FrameImage {
    /// Copies the pixels verbatim; no color conversion or row reordering.
    pub fn from_pixels(pixels: &PixelBuffer) -> Result<Self, EncodeError> {
        let (width, height) = (pixels.width(), pixels.height());
        let image = RgbaImage::from_raw(width, height, pixels.as_bytes().to_vec()).ok_or(
            EncodeError::Dimensions {
                width,
                height,
                len: pixels.as_bytes().len(),
            },
        )?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn encode<E: ImageEncoder>(&self, encoder: &E) -> Result<Vec<u8>, EncodeError> {
        encoder.encode(self.as_bytes(), self.width(), self.height())
    }
}
