//! Remote validator contract.
//!
//! The validator checks enrollment status for a signing session and
//! validates completed ceremony proofs. It is an external collaborator
//! reached through a narrow request/response contract; the HTTP client
//! lives in `services` behind the `network` feature.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{CeremonyType, CredentialReference, EncodedCeremony};
use crate::error::Result;

/// Payload submitted for remote validation of a completed ceremony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub session_id: String,
    pub ceremony: CeremonyType,
    pub credential: EncodedCeremony,
    /// Stable digest identifying the device context of the attempt.
    pub device_context: String,
}

/// Validator verdict. `validation_passed == false` means the ceremony
/// mechanically succeeded but the proof was not accepted: a rejection,
/// never a fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub validation_passed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
}

/// Remote collaborator that answers enrollment lookups and validates
/// ceremony proofs.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Look up an existing credential for the signing session. `None`
    /// means the signer has not enrolled yet.
    async fn lookup_credential(&self, session_id: &str) -> Result<Option<CredentialReference>>;

    /// Submit an encoded ceremony result for validation.
    async fn validate(&self, request: ValidationRequest) -> Result<ValidationResponse>;
}
