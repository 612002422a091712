/// Model the camera registers as with the host (`family:name`).
pub const MODEL_TRIPLET: &str = "bill:video:replay";

/// Attributes every replay camera configuration must carry.
pub const REQUIRED_ATTRIBUTES: &[&str] = &["video_path"];

pub const JPEG_MIME_TYPE: &str = "image/jpeg";
pub const JPEG_QUALITY: u8 = 95;

/// Used when the container does not report a frame rate.
pub const FALLBACK_FPS: f64 = 30.0;

// Static camera calibration reported by `get_properties`.
pub const INTRINSIC_FX: f64 = 600.0;
pub const INTRINSIC_FY: f64 = 600.0;
pub const INTRINSIC_CX: f64 = 320.0;
pub const INTRINSIC_CY: f64 = 240.0;
pub const DISTORTION_MODEL: &str = "radial_tangential";
/// k1, k2, p1, p2, k3.
pub const DISTORTION_COEFFICIENTS: [f64; 5] = [0.1, 0.01, 0.001, 0.0001, 0.00001];
