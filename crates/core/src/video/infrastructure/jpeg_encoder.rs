use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use image::ExtendedColorType;

use crate::shared::constants::{JPEG_MIME_TYPE, JPEG_QUALITY};
use crate::shared::frame::Frame;
use crate::video::domain::image_encoder::{EncodeError, ImageEncoder};

/// Compresses RGB frames to baseline JPEG using the `image` crate.
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    pub fn new() -> Self {
        Self {
            quality: JPEG_QUALITY,
        }
    }

    /// Quality is clamped to 1..=100.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageEncoder for JpegEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, EncodeError> {
        if frame.channels() != 3 {
            return Err(EncodeError::UnsupportedChannels {
                channels: frame.channels(),
            });
        }
        let expected = frame.width() as usize * frame.height() as usize * 3;
        if frame.data().len() != expected {
            return Err(EncodeError::BufferSize {
                expected,
                actual: frame.data().len(),
            });
        }

        let mut jpeg = Vec::new();
        ImageJpegEncoder::new_with_quality(&mut jpeg, self.quality)
            .encode(
                frame.data(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| EncodeError::Encode {
                index: frame.index(),
                source: Box::new(e),
            })?;
        Ok(jpeg)
    }

    fn mime_type(&self) -> &'static str {
        JPEG_MIME_TYPE
    }
}
