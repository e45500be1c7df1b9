//! Remote face service contract.
//!
//! Detection, comparison, and evidence persistence are external
//! collaborators reached through this narrow contract; the HTTP client
//! lives in `services` behind the `network` feature.

use async_trait::async_trait;

use super::types::{ComparisonResult, DetectionResult, FaceToken};
use crate::error::Result;

/// Remote collaborator exchanging images for face descriptors.
#[async_trait]
pub trait FaceExchange: Send + Sync {
    /// Detect faces in an encoded still image.
    async fn detect(&self, image: &[u8]) -> Result<DetectionResult>;

    /// Compare two face descriptor tokens. Pure remote call, no local
    /// mutation.
    async fn compare(
        &self,
        live: &FaceToken,
        registered: &FaceToken,
    ) -> Result<ComparisonResult>;

    /// Persist an accepted capture as audit evidence and return its
    /// storage reference. Must only be invoked on the accepted path.
    async fn persist_evidence(&self, image: &[u8]) -> Result<String>;
}
