use thiserror::Error;

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::BoxError;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("cannot encode frame with {channels} channels, expected 3")]
    UnsupportedChannels { channels: u8 },
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("failed to encode frame {index}: {source}")]
    Encode {
        index: usize,
        #[source]
        source: BoxError,
    },
}

/// Compresses a decoded frame into a still image for transport.
pub trait ImageEncoder: Send + Sync {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, EncodeError>;

    /// MIME type of the bytes produced by [`ImageEncoder::encode`].
    fn mime_type(&self) -> &'static str;
}
