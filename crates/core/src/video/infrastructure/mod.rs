pub mod ffmpeg_frame_source;
pub mod jpeg_encoder;

#[cfg(test)]
pub(crate) mod test_support;
