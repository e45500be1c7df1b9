//! Credential validator HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{base_url, http_client};
use crate::config::GateConfig;
use crate::credential::{
    CredentialReference, CredentialValidator, ValidationRequest, ValidationResponse,
};
use crate::error::{GateError, Result};

/// Client for the enrollment-lookup and credential-validation endpoints.
pub struct ValidatorClient {
    client: reqwest::Client,
    base_url: String,
}

/// Enrollment lookup response; `credential_id` absent when the signer
/// has not enrolled.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    credential_id: Option<String>,
}

impl ValidatorClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url(url),
        })
    }

    pub fn from_config(config: &GateConfig) -> Result<Self> {
        Self::new(
            &config.validator_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }
}

#[async_trait]
impl CredentialValidator for ValidatorClient {
    #[instrument(level = "debug", skip(self))]
    async fn lookup_credential(&self, session_id: &str) -> Result<Option<CredentialReference>> {
        let url = format!("{}/credentials/{session_id}", self.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(GateError::Service(format!(
                "enrollment lookup returned status {}",
                response.status()
            )));
        }

        let lookup: LookupResponse = response.json().await?;
        debug!(found = lookup.credential_id.is_some(), "enrollment lookup complete");
        Ok(lookup.credential_id.map(CredentialReference))
    }

    #[instrument(level = "debug", skip(self, request), fields(session_id = %request.session_id, ceremony = ?request.ceremony))]
    async fn validate(&self, request: ValidationRequest) -> Result<ValidationResponse> {
        let url = format!("{}/validate", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(GateError::Service(format!(
                "validation returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}
