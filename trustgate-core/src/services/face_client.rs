//! Face detection/comparison HTTP client.
//!
//! Images travel as standard base64 in JSON bodies; descriptor tokens
//! are opaque strings minted by the service.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{base_url, http_client};
use crate::config::GateConfig;
use crate::error::{GateError, Result};
use crate::face::{ComparisonResult, DetectionResult, FaceExchange, FaceToken};

/// Client for the face detection, comparison, and evidence endpoints.
pub struct FaceServiceClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    image_base64: String,
}

#[derive(Debug, Serialize)]
struct CompareRequest<'a> {
    face_token1: &'a str,
    face_token2: &'a str,
}

#[derive(Debug, Deserialize)]
struct EvidenceResponse {
    evidence_id: String,
}

impl FaceServiceClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url(url),
        })
    }

    pub fn from_config(config: &GateConfig) -> Result<Self> {
        Self::new(
            &config.face_service_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    async fn post_image<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        image: &[u8],
    ) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        let request = ImageRequest {
            image_base64: BASE64.encode(image),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(GateError::Service(format!(
                "{endpoint} returned status {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl FaceExchange for FaceServiceClient {
    #[instrument(level = "debug", skip(self, image), fields(image_bytes = image.len()))]
    async fn detect(&self, image: &[u8]) -> Result<DetectionResult> {
        let detection: DetectionResult = self.post_image("detect", image).await?;
        debug!(face_num = detection.face_num, "detection complete");
        Ok(detection)
    }

    #[instrument(level = "debug", skip_all)]
    async fn compare(
        &self,
        live: &FaceToken,
        registered: &FaceToken,
    ) -> Result<ComparisonResult> {
        let url = format!("{}/compare", self.base_url);
        let request = CompareRequest {
            face_token1: &registered.0,
            face_token2: &live.0,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(GateError::Service(format!(
                "compare returned status {}",
                response.status()
            )));
        }

        let comparison: ComparisonResult = response.json().await?;
        debug!(confidence = comparison.confidence, "comparison complete");
        Ok(comparison)
    }

    #[instrument(level = "debug", skip(self, image), fields(image_bytes = image.len()))]
    async fn persist_evidence(&self, image: &[u8]) -> Result<String> {
        let evidence: EvidenceResponse = self.post_image("evidence", image).await?;
        Ok(evidence.evidence_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_request_carries_standard_base64() {
        let request = ImageRequest {
            image_base64: BASE64.encode([0xff, 0xd8, 0xff]),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("/9j/"));
    }

    #[test]
    fn comparison_parses_service_json() {
        let comparison: ComparisonResult = serde_json::from_str(
            r#"{"confidence":88.2,"thresholds":{"e3":62.3,"e4":69.1,"e5":73.9}}"#,
        )
        .unwrap();
        assert!(comparison.matched(85.0));
    }
}
