use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("failed to open video {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("no video stream found in {0}")]
    NoVideoStream(PathBuf),
    #[error("failed to decode frame {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: BoxError,
    },
}

/// Random-access frame reader over a single video file.
///
/// Implementations open the underlying file lazily, so constructing a source
/// for a missing or corrupt path succeeds and the failure is reported by the
/// first call that needs the stream.
pub trait FrameSource: Send {
    /// Path this source reads from.
    fn path(&self) -> &Path;

    /// Opens the stream if needed and returns its metadata.
    fn metadata(&mut self) -> Result<VideoMetadata, VideoError>;

    /// Seeks to `index` and decodes that one frame.
    ///
    /// Returns `Ok(None)` when the stream has no frame at `index`.
    fn frame_at(&mut self, index: usize) -> Result<Option<Frame>, VideoError>;

    /// Releases decoder resources. Calling it twice is harmless.
    fn close(&mut self);
}
