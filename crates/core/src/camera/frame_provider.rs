use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::camera::domain::camera::{
    Camera, CameraError, CameraImage, ImageRequest, NamedImage, PointCloud, Reconfigurable,
    ResponseMetadata,
};
use crate::camera::domain::config::{ComponentConfig, ReplayConfig};
use crate::camera::domain::playhead::Playhead;
use crate::camera::domain::properties::CameraProperties;
use crate::shared::clock::{Clock, SystemClock};
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::image_encoder::ImageEncoder;
use crate::video::infrastructure::ffmpeg_frame_source::FfmpegFrameSource;
use crate::video::infrastructure::jpeg_encoder::JpegEncoder;

/// Opens a frame source for a configured video path.
pub type SourceFactory = Box<dyn Fn(&Path) -> Box<dyn FrameSource> + Send + Sync>;

struct ReplayState {
    source: Option<Box<dyn FrameSource>>,
    playhead: Playhead,
}

/// Camera that replays a video file as if it were a live feed.
///
/// Each image request advances the playhead by the frames that elapsed in
/// real time since the previous successful request, then decodes and encodes
/// that frame. Past the end of the video it wraps to frame 0.
///
/// The decoder and the playhead sit behind one lock: concurrent requests are
/// served one at a time, and reconfiguration waits for in-flight requests.
pub struct FrameProvider {
    name: String,
    open_source: SourceFactory,
    encoder: Box<dyn ImageEncoder>,
    clock: Box<dyn Clock>,
    state: Mutex<ReplayState>,
}

impl FrameProvider {
    /// Builds a replay camera that decodes with ffmpeg and serves JPEG.
    pub fn new(config: &ComponentConfig) -> Result<Self, CameraError> {
        Self::with_parts(
            config,
            Box::new(|path: &Path| -> Box<dyn FrameSource> {
                Box::new(FfmpegFrameSource::new(path))
            }),
            Box::new(JpegEncoder::new()),
            Box::new(SystemClock),
        )
    }

    pub fn with_parts(
        config: &ComponentConfig,
        open_source: SourceFactory,
        encoder: Box<dyn ImageEncoder>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CameraError> {
        let playhead = Playhead::new(clock.now());
        let provider = Self {
            name: config.name.clone(),
            open_source,
            encoder,
            clock,
            state: Mutex::new(ReplayState {
                source: None,
                playhead,
            }),
        };
        provider.reconfigure(config)?;
        Ok(provider)
    }

    /// Current playhead position.
    pub fn frame_index(&self) -> usize {
        self.lock_state().playhead.frame_index()
    }

    // The state is consistent between statements, so a panic in another
    // request leaves nothing half-updated.
    fn lock_state(&self) -> MutexGuard<'_, ReplayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fetch_frame(&self, state: &mut ReplayState) -> Result<Frame, CameraError> {
        let source = state
            .source
            .as_mut()
            .ok_or_else(|| CameraError::NotConfigured(self.name.clone()))?;
        let now = self.clock.now();

        let fps = match source.metadata() {
            Ok(metadata) => metadata.fps,
            Err(e) => {
                state.playhead.rewind();
                return Err(CameraError::DecodeExhausted {
                    path: source.path().to_path_buf(),
                    source: Some(e),
                });
            }
        };

        let index = state.playhead.advance(now, fps);
        log::debug!("{}: fetching frame {index} at {fps:.2} fps", self.name);

        let frame = match source.frame_at(index) {
            Ok(Some(frame)) => frame,
            missed => {
                if let Err(e) = missed {
                    log::warn!("{}: failed to decode frame {index}: {e}", self.name);
                }
                log::info!(
                    "{}: no frame {index} in {}, restarting from frame 0",
                    self.name,
                    source.path().display()
                );
                state.playhead.rewind();
                match source.frame_at(0) {
                    Ok(Some(frame)) => frame,
                    Ok(None) => {
                        return Err(CameraError::DecodeExhausted {
                            path: source.path().to_path_buf(),
                            source: None,
                        })
                    }
                    Err(e) => {
                        return Err(CameraError::DecodeExhausted {
                            path: source.path().to_path_buf(),
                            source: Some(e),
                        })
                    }
                }
            }
        };

        state.playhead.mark_fetched(now);
        Ok(frame)
    }
}

impl Camera for FrameProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_image(&self, request: &ImageRequest) -> Result<CameraImage, CameraError> {
        if let Some(requested) = request.mime_type.as_deref() {
            if !requested.is_empty() && requested != self.encoder.mime_type() {
                log::debug!(
                    "{}: {requested} requested, serving {}",
                    self.name,
                    self.encoder.mime_type()
                );
            }
        }

        let mut state = self.lock_state();
        let frame = self.fetch_frame(&mut state)?;
        let data = self.encoder.encode(&frame)?;
        Ok(CameraImage {
            data,
            mime_type: self.encoder.mime_type().to_string(),
        })
    }

    fn get_images(
        &self,
        _timeout: Option<Duration>,
    ) -> Result<(Vec<NamedImage>, ResponseMetadata), CameraError> {
        Err(CameraError::NotImplemented("get_images"))
    }

    fn get_point_cloud(&self, _request: &ImageRequest) -> Result<PointCloud, CameraError> {
        Err(CameraError::NotImplemented("get_point_cloud"))
    }

    fn get_properties(&self, _timeout: Option<Duration>) -> Result<CameraProperties, CameraError> {
        Ok(CameraProperties::replay())
    }
}

impl Reconfigurable for FrameProvider {
    fn reconfigure(&self, config: &ComponentConfig) -> Result<(), CameraError> {
        log::info!("Reconfiguring {}", self.name);
        let replay = ReplayConfig::from_attributes(&config.attributes)?;

        let mut state = self.lock_state();
        if let Some(mut previous) = state.source.take() {
            previous.close();
        }
        state.source = Some((self.open_source)(&replay.video_path));
        log::info!("{}: replaying {}", self.name, replay.video_path.display());
        Ok(())
    }

    fn close(&self) {
        if let Some(mut source) = self.lock_state().source.take() {
            source.close();
            log::info!("{}: closed {}", self.name, source.path().display());
        }
    }
}
