//! Face-match trust gate.
//!
//! Captures one still frame from a live video source, exchanges it for a
//! face descriptor token, compares it against the registered token, and
//! applies a fixed confidence threshold.
//!
//! ## Architecture
//!
//! - `types`: tokens, thresholds, detection and comparison results
//! - `camera`: video-source seam and JPEG still capture
//! - `service`: remote detection/comparison/evidence contract
//! - `verifier`: the capture -> detect -> compare -> decide cycle
//! - `scripted`: canned service fake for tests

pub mod camera;
pub mod scripted;
pub mod service;
pub mod types;
pub mod verifier;

pub use camera::{capture_frame, RawFrame, StaticFrameSource, VideoFrameSource};
pub use scripted::ScriptedFaceService;
pub use service::FaceExchange;
pub use types::{ComparisonResult, DetectedFace, DetectionResult, FaceToken, Thresholds};
pub use verifier::{FaceMatchVerifier, NO_FACE_REASON};
