//! Scripted credential fakes for tests.
//! WARNING: these produce deterministic fake proofs - never use in
//! production!

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use sha3::{Digest, Sha3_256};

use super::authenticator::{AuthenticatorError, CredentialAuthenticator};
use super::types::{AssertionRequest, CeremonyResult, CreationRequest, CredentialReference};
use super::validator::{CredentialValidator, ValidationRequest, ValidationResponse};
use crate::codec;
use crate::error::{GateError, Result};

/// Derive deterministic fake bytes from a tag and a challenge.
fn derive(tag: &[u8], challenge: &[u8]) -> Vec<u8> {
    let mut hasher = Sha3_256::new();
    hasher.update(tag);
    hasher.update(challenge);
    hasher.finalize().to_vec()
}

/// Scripted local authenticator.
///
/// Succeeds with challenge-derived fake proofs, or fails with a fixed
/// error, and counts how often each ceremony was invoked.
pub struct ScriptedAuthenticator {
    supported: bool,
    failure: Option<AuthenticatorError>,
    pub create_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
}

impl ScriptedAuthenticator {
    /// Authenticator that completes every ceremony successfully.
    pub fn succeeding() -> Self {
        Self {
            supported: true,
            failure: None,
            create_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        }
    }

    /// Authenticator whose ceremonies all fail with `error`.
    pub fn failing(error: AuthenticatorError) -> Self {
        Self {
            failure: Some(error),
            ..Self::succeeding()
        }
    }

    /// Device without any platform authenticator capability.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            failure: Some(AuthenticatorError::Unsupported),
            ..Self::succeeding()
        }
    }
}

#[async_trait]
impl CredentialAuthenticator for ScriptedAuthenticator {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn create(
        &self,
        request: CreationRequest,
    ) -> std::result::Result<CeremonyResult, AuthenticatorError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let challenge = request.challenge.as_bytes();
        let raw_id = derive(b"credential-id", challenge)[..16].to_vec();
        Ok(CeremonyResult::Attestation {
            credential_id: codec::encode(&raw_id),
            raw_id,
            attestation_object: derive(b"attestation-object", challenge),
            client_data_json: b"{\"type\":\"webauthn.create\"}".to_vec(),
        })
    }

    async fn get(
        &self,
        request: AssertionRequest,
    ) -> std::result::Result<CeremonyResult, AuthenticatorError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let raw_id = request
            .allow_credentials
            .first()
            .cloned()
            .ok_or_else(|| AuthenticatorError::Platform("no allowed credential".to_string()))?;

        let challenge = request.challenge.as_bytes();
        Ok(CeremonyResult::Assertion {
            credential_id: codec::encode(&raw_id),
            raw_id,
            authenticator_data: derive(b"authenticator-data", challenge),
            client_data_json: b"{\"type\":\"webauthn.get\"}".to_vec(),
            signature: derive(b"signature", challenge),
            user_handle: None,
        })
    }
}

/// Scripted remote validator.
///
/// Answers lookups from a canned credential, returns a fixed verdict,
/// and records every validation request for assertion.
pub struct ScriptedValidator {
    credential: Option<CredentialReference>,
    verdict: ValidationResponse,
    lookup_fails: bool,
    validate_fails: bool,
    pub lookup_calls: AtomicUsize,
    pub validate_calls: AtomicUsize,
    pub requests: Mutex<Vec<ValidationRequest>>,
}

impl ScriptedValidator {
    /// Validator that knows no credential and passes every proof.
    pub fn passing() -> Self {
        Self {
            credential: None,
            verdict: ValidationResponse {
                validation_passed: true,
                error_message: None,
            },
            lookup_fails: false,
            validate_fails: false,
            lookup_calls: AtomicUsize::new(0),
            validate_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Validator that rejects every proof with `reason`.
    pub fn rejecting(reason: &str) -> Self {
        Self {
            verdict: ValidationResponse {
                validation_passed: false,
                error_message: Some(reason.to_string()),
            },
            ..Self::passing()
        }
    }

    /// Pre-register a stored credential for lookups.
    pub fn with_credential(mut self, credential: CredentialReference) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Make the enrollment lookup fail at the transport level.
    pub fn with_failing_lookup(mut self) -> Self {
        self.lookup_fails = true;
        self
    }

    /// Make validation fail at the transport level.
    pub fn with_failing_validate(mut self) -> Self {
        self.validate_fails = true;
        self
    }
}

#[async_trait]
impl CredentialValidator for ScriptedValidator {
    async fn lookup_credential(&self, _session_id: &str) -> Result<Option<CredentialReference>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.lookup_fails {
            return Err(GateError::Service("enrollment lookup unreachable".to_string()));
        }
        Ok(self.credential.clone())
    }

    async fn validate(&self, request: ValidationRequest) -> Result<ValidationResponse> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if self.validate_fails {
            return Err(GateError::Service("validator unreachable".to_string()));
        }
        self.requests.lock().unwrap().push(request);
        Ok(self.verdict.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::types::Challenge;

    #[tokio::test]
    async fn scripted_create_is_challenge_deterministic() {
        let authenticator = ScriptedAuthenticator::succeeding();
        let request = |challenge: Challenge| CreationRequest {
            challenge,
            relying_party: crate::credential::RelyingParty {
                id: "localhost".to_string(),
                name: "test".to_string(),
            },
            user: crate::credential::UserIdentity::for_session("REQ-1"),
            algorithms: vec![crate::credential::COSE_ES256],
            selection: Default::default(),
            timeout_ms: 60_000,
        };

        // Distinct challenges produce distinct fake credentials.
        let first = authenticator
            .create(request(Challenge::generate().unwrap()))
            .await
            .unwrap();
        let second = authenticator
            .create(request(Challenge::generate().unwrap()))
            .await
            .unwrap();

        let (CeremonyResult::Attestation { raw_id: a, .. }, CeremonyResult::Attestation { raw_id: b, .. }) =
            (first, second)
        else {
            panic!("create must yield attestations");
        };
        assert_ne!(a, b);
        assert_eq!(authenticator.create_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn scripted_get_echoes_allowed_credential() {
        let authenticator = ScriptedAuthenticator::succeeding();
        let result = authenticator
            .get(AssertionRequest {
                challenge: Challenge::generate().unwrap(),
                rp_id: "localhost".to_string(),
                allow_credentials: vec![vec![1, 2, 3]],
                user_verification_required: true,
                timeout_ms: 60_000,
            })
            .await
            .unwrap();

        let CeremonyResult::Assertion { raw_id, .. } = result else {
            panic!("get must yield an assertion");
        };
        assert_eq!(raw_id, vec![1, 2, 3]);
    }
}
