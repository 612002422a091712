//! A camera component that replays a recorded video file as a live feed.
//!
//! [`camera::frame_provider::FrameProvider`] implements the host camera
//! contract ([`camera::domain::camera::Camera`]): each image request serves
//! the frame that real playback would show by now, encoded as JPEG.

pub mod camera;
pub mod shared;
pub mod video;
