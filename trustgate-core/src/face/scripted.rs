//! Scripted face service for tests.
//! WARNING: returns canned results - never use in production!

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::service::FaceExchange;
use super::types::{ComparisonResult, DetectedFace, DetectionResult, FaceToken, Thresholds};
use crate::error::{GateError, Result};

/// Canned face service with call counters for every operation, so tests
/// can assert which remote calls a flow performed.
pub struct ScriptedFaceService {
    face_num: u32,
    confidence: f32,
    detect_fails: bool,
    compare_fails: bool,
    persist_fails: bool,
    pub detect_calls: AtomicUsize,
    pub compare_calls: AtomicUsize,
    pub persist_calls: AtomicUsize,
}

impl ScriptedFaceService {
    /// Service that detects one face and compares at `confidence`.
    pub fn with_confidence(confidence: f32) -> Self {
        Self {
            face_num: 1,
            confidence,
            detect_fails: false,
            compare_fails: false,
            persist_fails: false,
            detect_calls: AtomicUsize::new(0),
            compare_calls: AtomicUsize::new(0),
            persist_calls: AtomicUsize::new(0),
        }
    }

    /// Service that finds no face in any image.
    pub fn with_no_face() -> Self {
        Self {
            face_num: 0,
            ..Self::with_confidence(0.0)
        }
    }

    /// Make detection fail at the transport level.
    pub fn with_failing_detect(mut self) -> Self {
        self.detect_fails = true;
        self
    }

    /// Make comparison fail at the transport level.
    pub fn with_failing_compare(mut self) -> Self {
        self.compare_fails = true;
        self
    }

    /// Make evidence persistence fail at the transport level.
    pub fn with_failing_persist(mut self) -> Self {
        self.persist_fails = true;
        self
    }
}

#[async_trait]
impl FaceExchange for ScriptedFaceService {
    async fn detect(&self, _image: &[u8]) -> Result<DetectionResult> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        if self.detect_fails {
            return Err(GateError::Service("detection service unreachable".to_string()));
        }
        Ok(DetectionResult {
            face_num: self.face_num,
            faces: (0..self.face_num)
                .map(|i| DetectedFace {
                    face_token: FaceToken(format!("live-token-{i}")),
                })
                .collect(),
        })
    }

    async fn compare(
        &self,
        _live: &FaceToken,
        _registered: &FaceToken,
    ) -> Result<ComparisonResult> {
        self.compare_calls.fetch_add(1, Ordering::SeqCst);
        if self.compare_fails {
            return Err(GateError::Service("comparison service unreachable".to_string()));
        }
        Ok(ComparisonResult {
            confidence: self.confidence,
            thresholds: Thresholds {
                e3: 62.3,
                e4: 69.1,
                e5: 73.9,
            },
        })
    }

    async fn persist_evidence(&self, _image: &[u8]) -> Result<String> {
        let call = self.persist_calls.fetch_add(1, Ordering::SeqCst);
        if self.persist_fails {
            return Err(GateError::Service("evidence store unreachable".to_string()));
        }
        Ok(format!("evidence-{:04}", call + 1))
    }
}
