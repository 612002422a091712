use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::camera::domain::config::{ComponentConfig, ConfigError};
use crate::camera::domain::properties::CameraProperties;
use crate::video::domain::frame_source::VideoError;
use crate::video::domain::image_encoder::EncodeError;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to capture any frame from the video {path}")]
    DecodeExhausted {
        path: PathBuf,
        #[source]
        source: Option<VideoError>,
    },
    #[error("failed to encode frame: {0}")]
    Encode(#[from] EncodeError),
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
    #[error("camera {0} has no video source configured")]
    NotConfigured(String),
}

/// Optional arguments the host passes with an image request.
///
/// None of them change what the replay camera returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageRequest {
    pub mime_type: Option<String>,
    pub extra: Option<Map<String, Value>>,
    pub timeout: Option<Duration>,
}

/// Encoded still image tagged with its MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedImage {
    pub name: String,
    pub image: CameraImage,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseMetadata {
    pub captured_at: SystemTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Camera operations the host framework calls.
///
/// The host may call from several threads at once, so every method takes
/// `&self` and implementations synchronise internally.
pub trait Camera: Send + Sync {
    fn name(&self) -> &str;

    fn get_image(&self, request: &ImageRequest) -> Result<CameraImage, CameraError>;

    fn get_images(
        &self,
        timeout: Option<Duration>,
    ) -> Result<(Vec<NamedImage>, ResponseMetadata), CameraError>;

    fn get_point_cloud(&self, request: &ImageRequest) -> Result<PointCloud, CameraError>;

    fn get_properties(&self, timeout: Option<Duration>) -> Result<CameraProperties, CameraError>;
}

/// Lifecycle hooks the host drives when configuration changes or the
/// component is removed.
pub trait Reconfigurable {
    fn reconfigure(&self, config: &ComponentConfig) -> Result<(), CameraError>;

    /// Releases held resources. Later image requests fail until the next
    /// successful reconfigure.
    fn close(&self);
}
