use std::path::{Path, PathBuf};

use ffmpeg_next::format::context::Input;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video as VideoFrame;
use ffmpeg_next::Rational;

use crate::shared::constants::FALLBACK_FPS;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::{FrameSource, VideoError};

/// Seekable frame source backed by ffmpeg-next (libavformat + libavcodec).
///
/// The file is opened on first use. Each [`FrameSource::frame_at`] call
/// seeks to the nearest keyframe at or before the requested frame, then
/// decodes forward until the presentation timestamp reaches it. Frames are
/// converted to packed RGB24.
pub struct FfmpegFrameSource {
    path: PathBuf,
    opened: Option<OpenedVideo>,
}

// Safety: FfmpegFrameSource is only used from a single thread at a time
// (callers hold it behind a lock). The raw pointers inside ffmpeg types are
// never shared across threads.
unsafe impl Send for FfmpegFrameSource {}

impl FfmpegFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            opened: None,
        }
    }

    fn ensure_open(&mut self) -> Result<&mut OpenedVideo, VideoError> {
        let video = match self.opened.take() {
            Some(video) => video,
            None => {
                let video = OpenedVideo::open(&self.path)?;
                log::info!(
                    "Opened {}: {}x{} @ {:.2} fps ({})",
                    self.path.display(),
                    video.metadata.width,
                    video.metadata.height,
                    video.metadata.fps,
                    video.metadata.codec
                );
                video
            }
        };
        Ok(self.opened.insert(video))
    }
}

impl FrameSource for FfmpegFrameSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn metadata(&mut self) -> Result<VideoMetadata, VideoError> {
        Ok(self.ensure_open()?.metadata.clone())
    }

    fn frame_at(&mut self, index: usize) -> Result<Option<Frame>, VideoError> {
        self.ensure_open()?.frame_at(index)
    }

    fn close(&mut self) {
        if self.opened.take().is_some() {
            log::debug!("Closed {}", self.path.display());
        }
    }
}

struct OpenedVideo {
    input: Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    stream_index: usize,
    time_base: Rational,
    start_pts: i64,
    metadata: VideoMetadata,
}

impl OpenedVideo {
    fn open(path: &Path) -> Result<Self, VideoError> {
        let open_error = |e: ffmpeg_next::Error| VideoError::Open {
            path: path.to_path_buf(),
            source: Box::new(e),
        };

        ffmpeg_next::init().map_err(open_error)?;
        let input = ffmpeg_next::format::input(&path).map_err(open_error)?;

        let (stream_index, time_base, start_pts, rate, stream_frames, decoder) = {
            let stream = input
                .streams()
                .best(ffmpeg_next::media::Type::Video)
                .ok_or_else(|| VideoError::NoVideoStream(path.to_path_buf()))?;
            let codec_ctx =
                ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
                    .map_err(open_error)?;
            let decoder = codec_ctx.decoder().video().map_err(open_error)?;
            // i64::MIN is ffmpeg's "no timestamp" marker.
            let start_pts = match stream.start_time() {
                i64::MIN => 0,
                pts => pts,
            };
            (
                stream.index(),
                stream.time_base(),
                start_pts,
                stream.rate(),
                stream.frames(),
                decoder,
            )
        };

        let fps = if rate.numerator() > 0 && rate.denominator() > 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            log::warn!(
                "{} reports no frame rate, assuming {FALLBACK_FPS} fps",
                path.display()
            );
            FALLBACK_FPS
        };

        let width = decoder.width();
        let height = decoder.height();
        let scaler = scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )
        .map_err(open_error)?;

        let metadata = VideoMetadata {
            width,
            height,
            fps,
            total_frames: stream_frames.max(0) as usize,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
        };

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            time_base,
            start_pts,
            metadata,
        })
    }

    fn frame_at(&mut self, index: usize) -> Result<Option<Frame>, VideoError> {
        self.seek(index);

        let mut decoded = VideoFrame::empty();
        let mut eof_sent = false;
        loop {
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                let reached = match self.frame_number(&decoded) {
                    Some(number) => number >= index as i64,
                    None => true,
                };
                if reached {
                    return self.convert(&decoded, index).map(Some);
                }
            }

            if eof_sent {
                return Ok(None);
            }

            match self.input.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != self.stream_index {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        log::debug!("Skipping undecodable packet: {e}");
                    }
                }
                None => {
                    let _ = self.decoder.send_eof();
                    eof_sent = true;
                }
            }
        }
    }

    /// Positions the demuxer at or before `index` and resets the decoder.
    fn seek(&mut self, index: usize) {
        let target_us = (index as f64 / self.metadata.fps * 1_000_000.0).round() as i64;
        let sought = if index == 0 {
            self.input.seek(0, ..)
        } else {
            self.input.seek(target_us, ..target_us)
        };
        if let Err(e) = sought {
            // Decoding forward from the start still reaches the frame.
            log::debug!("Seek to frame {index} failed ({e}), rewinding");
            let _ = self.input.seek(0, ..);
        }
        self.decoder.flush();
    }

    /// Maps a decoded frame's timestamp to its index in the stream.
    fn frame_number(&self, decoded: &VideoFrame) -> Option<i64> {
        let pts = decoded.timestamp().or_else(|| decoded.pts())?;
        let seconds = (pts - self.start_pts) as f64 * self.time_base.numerator() as f64
            / self.time_base.denominator() as f64;
        Some((seconds * self.metadata.fps).round() as i64)
    }

    fn convert(&mut self, decoded: &VideoFrame, index: usize) -> Result<Frame, VideoError> {
        let mut rgb_frame = VideoFrame::empty();
        self.scaler
            .run(decoded, &mut rgb_frame)
            .map_err(|e| VideoError::Decode {
                index,
                source: Box::new(e),
            })?;
        let (width, height) = (self.metadata.width, self.metadata.height);
        let pixels = extract_rgb_pixels(&rgb_frame, width, height);
        Ok(Frame::new(pixels, width, height, 3, index))
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may have padding bytes at the end of each row (stride > width*3).
/// This function strips that padding to produce a tightly-packed pixel buffer.
fn extract_rgb_pixels(rgb_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
