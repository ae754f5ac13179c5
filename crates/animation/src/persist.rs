use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::encode::{EncodeError, FrameImage, ImageEncoder};

/// Frame numbers are padded to this many digits.
pub const FRAME_NUMBER_WIDTH: usize = 4;
/// Largest frame count whose padded names still sort numerically.
pub const MAX_FRAMES: u32 = 9_999;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to create output directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// File name of a 1-based frame, e.g. `0042.png`.
pub fn frame_file_name(index: u32, extension: &str) -> String {
    format!("{index:0width$}.{extension}", width = FRAME_NUMBER_WIDTH)
}

/// Encodes frames and writes them into one output directory.
#[derive(Clone, Debug)]
pub struct FrameWriter<E> {
    output_dir: PathBuf,
    encoder: E,
}

impl<E: ImageEncoder> FrameWriter<E> {
    pub fn new(output_dir: impl Into<PathBuf>, encoder: E) -> Self {
        Self {
            output_dir: output_dir.into(),
            encoder,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Creates the output directory (and parents) if it does not exist yet.
    pub fn prepare(&self) -> Result<(), PersistError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| PersistError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })
    }

    pub fn path_for(&self, index: u32) -> PathBuf {
        self.output_dir
            .join(frame_file_name(index, self.encoder.extension()))
    }

    /// Encodes `image` and writes it to the frame's path, replacing any existing file.
    pub fn save(&self, index: u32, image: &FrameImage) -> Result<PathBuf, PersistError> {
        let bytes = image.encode(&self.encoder)?;
        let path = self.path_for(index);
        fs::write(&path, &bytes).map_err(|source| PersistError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::trace!(path = %path.display(), bytes = bytes.len(), "wrote frame");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::encode::PngEncoder;
    use crate::pixels::PixelBuffer;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> FrameImage {
        let data = rgba.repeat((width * height) as usize);
        FrameImage::from_pixels(&PixelBuffer::new(width, height, data).unwrap()).unwrap()
    }

    #[test]
    fn names_are_zero_padded() {
        assert_eq!(frame_file_name(1, "png"), "0001.png");
        assert_eq!(frame_file_name(42, "png"), "0042.png");
        assert_eq!(frame_file_name(1200, "png"), "1200.png");
        assert_eq!(frame_file_name(MAX_FRAMES, "png"), "9999.png");
    }

    #[test]
    fn lexicographic_order_matches_frame_order() {
        let names: Vec<String> = (1..=MAX_FRAMES)
            .map(|index| frame_file_name(index, "png"))
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn save_writes_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let writer = FrameWriter::new(dir.path().join("renders"), PngEncoder);
        writer.prepare().unwrap();

        let path = writer.save(7, &solid(4, 3, [255, 0, 0, 255])).unwrap();
        assert_eq!(path, dir.path().join("renders/0007.png"));
        let first = fs::read(&path).unwrap();

        writer.save(7, &solid(4, 3, [0, 0, 255, 255])).unwrap();
        let second = fs::read(&path).unwrap();
        assert_ne!(first, second);

        let decoded = image::load_from_memory(&second).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn write_failure_names_the_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let writer = FrameWriter::new(&missing, PngEncoder);

        let err = writer.save(3, &solid(2, 2, [1, 2, 3, 4])).unwrap_err();
        match err {
            PersistError::Write { path, .. } => assert_eq!(path, missing.join("0003.png")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
