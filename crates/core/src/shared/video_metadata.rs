use std::path::PathBuf;

/// Stream properties read when a video source is opened.
///
/// `total_frames` is whatever the container advertises and may be 0 when
/// the demuxer cannot tell; the playhead never relies on it.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}
