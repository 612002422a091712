use serde::Serialize;

use crate::shared::constants::{
    DISTORTION_COEFFICIENTS, DISTORTION_MODEL, INTRINSIC_CX, INTRINSIC_CY, INTRINSIC_FX,
    INTRINSIC_FY, JPEG_MIME_TYPE,
};

/// Pinhole intrinsics in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntrinsicParameters {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistortionParameters {
    pub model: String,
    pub coefficients: Vec<f64>,
}

/// Capabilities and calibration a camera reports to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraProperties {
    pub supports_pcd: bool,
    pub intrinsic_parameters: IntrinsicParameters,
    pub distortion_parameters: DistortionParameters,
    pub mime_types: Vec<String>,
}

impl CameraProperties {
    /// Fixed descriptor of the replay camera.
    ///
    /// `supports_pcd` stays `true` although point clouds are not served.
    pub fn replay() -> Self {
        Self {
            supports_pcd: true,
            intrinsic_parameters: IntrinsicParameters {
                fx: INTRINSIC_FX,
                fy: INTRINSIC_FY,
                cx: INTRINSIC_CX,
                cy: INTRINSIC_CY,
            },
            distortion_parameters: DistortionParameters {
                model: DISTORTION_MODEL.to_string(),
                coefficients: DISTORTION_COEFFICIENTS.to_vec(),
            },
            mime_types: vec![JPEG_MIME_TYPE.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_replay_intrinsics() {
        let props = CameraProperties::replay();
        let k = props.intrinsic_parameters;
        assert_relative_eq!(k.fx, 600.0);
        assert_relative_eq!(k.fy, 600.0);
        assert_relative_eq!(k.cx, 320.0);
        assert_relative_eq!(k.cy, 240.0);
    }

    #[test]
    fn test_replay_distortion() {
        let props = CameraProperties::replay();
        assert_eq!(props.distortion_parameters.model, "radial_tangential");
        let expected = [0.1, 0.01, 0.001, 0.0001, 0.00001];
        assert_eq!(props.distortion_parameters.coefficients.len(), expected.len());
        for (actual, expected) in props
            .distortion_parameters
            .coefficients
            .iter()
            .zip(expected)
        {
            assert_relative_eq!(*actual, expected);
        }
    }

    #[test]
    fn test_replay_reports_point_cloud_support() {
        assert!(CameraProperties::replay().supports_pcd);
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(CameraProperties::replay()).unwrap();
        assert_eq!(json["supports_pcd"], true);
        assert_eq!(json["intrinsic_parameters"]["fx"], 600.0);
        assert_eq!(json["distortion_parameters"]["model"], "radial_tangential");
        assert_eq!(json["mime_types"][0], "image/jpeg");
    }
}
