//! HTTP clients for the remote collaborators.
//!
//! JSON request/response contracts over reqwest, gated behind the
//! `network` feature so the ceremony and decision logic stay usable
//! without it. No internal retry: a failed call surfaces immediately and
//! any retry is a fresh caller-initiated attempt.

mod face_client;
mod validator_client;

pub use face_client::FaceServiceClient;
pub use validator_client::ValidatorClient;

use std::time::Duration;

use crate::error::{GateError, Result};

/// Build a reqwest client with the gate's request timeout.
fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GateError::Service(format!("failed to create HTTP client: {e}")))
}

/// Normalize a configured base URL (no trailing slash).
fn base_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}
