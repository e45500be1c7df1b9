//! Face-match verification flow.
//!
//! One capture-compare cycle: capture a still, detect the live face,
//! compare its descriptor against the registered token, and apply the
//! configured minimum confidence. Evidence is persisted only when the
//! match is accepted, so unverified biometric captures are never stored.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::camera::{capture_frame, VideoFrameSource};
use super::service::FaceExchange;
use super::types::{ComparisonResult, FaceToken};
use crate::config::GateConfig;
use crate::outcome::VerificationOutcome;

/// Rejection reason for a frame with no detectable face. The caller
/// should treat this as "retry capture", not "identity rejected".
pub const NO_FACE_REASON: &str = "no face detected; adjust the camera and try again";

/// Threshold-gated face-match verifier.
pub struct FaceMatchVerifier {
    service: Arc<dyn FaceExchange>,
    min_confidence: f32,
}

impl FaceMatchVerifier {
    pub fn new(service: Arc<dyn FaceExchange>, min_confidence: f32) -> Self {
        Self {
            service,
            min_confidence,
        }
    }

    pub fn from_config(config: &GateConfig, service: Arc<dyn FaceExchange>) -> Self {
        Self::new(service, config.min_confidence)
    }

    /// Run one full capture -> detect -> compare -> decide cycle.
    ///
    /// Takes `&mut self`: at most one cycle is in flight per verifier,
    /// driven by a single user action. Every retry starts from a fresh
    /// capture of whatever frame is then current.
    #[instrument(
        level = "info",
        skip(self, source, registered),
        fields(attempt_id = %Uuid::new_v4())
    )]
    pub async fn verify(
        &mut self,
        source: &dyn VideoFrameSource,
        registered: &FaceToken,
    ) -> VerificationOutcome {
        let image = match capture_frame(source) {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "frame capture failed");
                return VerificationOutcome::error(format!("could not capture a frame: {e}"));
            }
        };

        let detection = match self.service.detect(&image).await {
            Ok(detection) => detection,
            Err(e) => {
                warn!(error = %e, "face detection failed");
                return VerificationOutcome::error(format!("face detection failed: {e}"));
            }
        };

        let Some(live) = detection.first_face().cloned() else {
            info!("no face in the captured frame");
            return VerificationOutcome::rejected(NO_FACE_REASON);
        };

        let comparison = match self.service.compare(&live, registered).await {
            Ok(comparison) => comparison,
            Err(e) => {
                warn!(error = %e, "face comparison failed");
                return VerificationOutcome::error(format!("face comparison failed: {e}"));
            }
        };

        self.decide(&comparison, &image).await
    }

    /// Apply the single scalar accept gate and persist evidence on the
    /// accepted path only.
    async fn decide(&self, comparison: &ComparisonResult, image: &[u8]) -> VerificationOutcome {
        debug!(
            confidence = comparison.confidence,
            min_confidence = self.min_confidence,
            e3 = comparison.thresholds.e3,
            e4 = comparison.thresholds.e4,
            e5 = comparison.thresholds.e5,
            "comparison result"
        );

        if !comparison.matched(self.min_confidence) {
            info!(confidence = comparison.confidence, "face mismatch");
            return VerificationOutcome::rejected("face does not match the registered photo");
        }

        match self.service.persist_evidence(image).await {
            Ok(evidence_id) => {
                info!(%evidence_id, "face verified; evidence persisted");
                VerificationOutcome::accepted_with_evidence("face verified", evidence_id)
            }
            Err(e) => {
                warn!(error = %e, "evidence persistence failed");
                VerificationOutcome::error(format!("could not persist verification evidence: {e}"))
            }
        }
    }
}
