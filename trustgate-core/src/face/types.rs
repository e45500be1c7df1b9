//! Data model for face detection and comparison.

use serde::{Deserialize, Serialize};

/// Opaque face descriptor handle returned by the detection service.
///
/// Valid only for the lifetime of a single comparison call; never
/// persisted unless verification succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceToken(pub String);

/// Calibration bands supplied by the comparison service.
///
/// Carried through for audit and display only; they never alter the
/// accept decision, which is the single configured minimum confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub e3: f32,
    pub e4: f32,
    pub e5: f32,
}

/// Result of a remote face comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Similarity confidence on a 0-100 scale.
    pub confidence: f32,
    pub thresholds: Thresholds,
}

impl ComparisonResult {
    /// The local accept decision: confidence at or above the configured
    /// minimum. Boundary equality matches.
    pub fn matched(&self, min_confidence: f32) -> bool {
        self.confidence >= min_confidence
    }
}

/// One detected face, in the detection service's own ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedFace {
    pub face_token: FaceToken,
}

/// Detection service response for one submitted image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub face_num: u32,
    #[serde(default)]
    pub faces: Vec<DetectedFace>,
}

impl DetectionResult {
    /// The first reported face. Ordering is the remote service's
    /// contract and is not renegotiated locally; multi-face frames fall
    /// through to the first entry.
    pub fn first_face(&self) -> Option<&FaceToken> {
        if self.face_num == 0 {
            return None;
        }
        self.faces.first().map(|face| &face.face_token)
    }
}
