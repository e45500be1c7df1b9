//! Gate configuration
//!
//! Handles loading configuration from environment variables with sensible
//! defaults.

use url::Url;

use crate::error::{GateError, Result};

/// Configuration shared by both trust gates, loaded from environment
/// variables.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Relying-party identifier, typically the signing origin's hostname
    /// (default: "localhost").
    pub rp_id: String,
    /// Relying-party origin the ceremony is bound to
    /// (default: "http://localhost:3000").
    pub rp_origin: Url,
    /// Human-readable relying-party name shown by the authenticator
    /// (default: "TrustGate E-Sign").
    pub rp_name: String,
    /// Bounded wait delegated to the authenticator platform, milliseconds
    /// (default: 60000).
    pub ceremony_timeout_ms: u32,
    /// Minimum comparison confidence on a 0-100 scale required to accept
    /// a face match (default: 85).
    pub min_confidence: f32,
    /// Base URL of the credential validator service.
    pub validator_url: String,
    /// Base URL of the face detection/comparison service.
    pub face_service_url: String,
    /// Timeout for remote service calls in seconds (default: 30).
    pub request_timeout_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            rp_id: "localhost".to_string(),
            rp_origin: Url::parse("http://localhost:3000").expect("static URL is valid"),
            rp_name: "TrustGate E-Sign".to_string(),
            ceremony_timeout_ms: 60_000,
            min_confidence: 85.0,
            validator_url: "http://localhost:3000/api".to_string(),
            face_service_url: "http://localhost:3000/face".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl GateConfig {
    /// Load configuration from environment variables.
    ///
    /// - `TRUSTGATE_RP_ID` - Relying Party ID
    /// - `TRUSTGATE_RP_ORIGIN` - RP origin URL
    /// - `TRUSTGATE_RP_NAME` - RP display name
    /// - `TRUSTGATE_CEREMONY_TIMEOUT_MS` - authenticator ceremony timeout
    /// - `TRUSTGATE_MIN_CONFIDENCE` - face-match accept threshold (0-100)
    /// - `TRUSTGATE_VALIDATOR_URL` - credential validator base URL
    /// - `TRUSTGATE_FACE_SERVICE_URL` - face service base URL
    /// - `TRUSTGATE_REQUEST_TIMEOUT_SECS` - remote call timeout
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let rp_origin = match std::env::var("TRUSTGATE_RP_ORIGIN") {
            Ok(raw) => Url::parse(&raw)
                .map_err(|e| GateError::Precondition(format!("invalid TRUSTGATE_RP_ORIGIN: {e}")))?,
            Err(_) => defaults.rp_origin,
        };

        let min_confidence = match std::env::var("TRUSTGATE_MIN_CONFIDENCE") {
            Ok(raw) => {
                let value: f32 = raw.parse().map_err(|e| {
                    GateError::Precondition(format!("invalid TRUSTGATE_MIN_CONFIDENCE: {e}"))
                })?;
                if !(0.0..=100.0).contains(&value) {
                    return Err(GateError::Precondition(format!(
                        "TRUSTGATE_MIN_CONFIDENCE must be within 0-100, got {value}"
                    )));
                }
                value
            }
            Err(_) => defaults.min_confidence,
        };

        Ok(Self {
            rp_id: std::env::var("TRUSTGATE_RP_ID").unwrap_or(defaults.rp_id),
            rp_origin,
            rp_name: std::env::var("TRUSTGATE_RP_NAME").unwrap_or(defaults.rp_name),
            ceremony_timeout_ms: std::env::var("TRUSTGATE_CEREMONY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ceremony_timeout_ms),
            min_confidence,
            validator_url: std::env::var("TRUSTGATE_VALIDATOR_URL").unwrap_or(defaults.validator_url),
            face_service_url: std::env::var("TRUSTGATE_FACE_SERVICE_URL")
                .unwrap_or(defaults.face_service_url),
            request_timeout_secs: std::env::var("TRUSTGATE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
        })
    }
}
