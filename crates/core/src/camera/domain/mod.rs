pub mod camera;
pub mod config;
pub mod playhead;
pub mod properties;
