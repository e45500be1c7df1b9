//! Credential ceremony state machine.
//!
//! `{Init} -> resolve_enrollment -> {Enrolled | NotEnrolled | Unsupported}
//! -> run_ceremony -> {Accepted | Rejected | Error}`
//!
//! `Unsupported` is terminal: no ceremony is attempted. A terminal
//! attempt outcome does not consume the resolved state; the caller may
//! re-enter `run_ceremony` for a retry, and a fresh challenge is
//! generated on every attempt.

use std::sync::Arc;

use sha3::{Digest, Sha3_256};
use tracing::{info, instrument, warn};
use url::Url;
use uuid::Uuid;

use super::authenticator::{AuthenticatorError, CredentialAuthenticator};
use super::types::{
    AssertionRequest, AuthenticatorSelection, CeremonyResult, Challenge, CreationRequest,
    CredentialReference, EnrollmentState, RelyingParty, UserIdentity, COSE_ES256,
};
use super::validator::{CredentialValidator, ValidationRequest};
use crate::config::GateConfig;
use crate::outcome::VerificationOutcome;

/// Stable digest identifying the device context bound into every
/// validation request.
pub fn device_context(rp_origin: &Url) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(rp_origin.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

/// Immutable snapshot of a session's enrollment resolution, threaded
/// into every ceremony attempt. Resolved once per session.
#[derive(Debug, Clone)]
pub struct ResolvedEnrollment {
    pub session_id: String,
    pub state: EnrollmentState,
    /// Present only when `state` is `Enrolled`.
    pub credential: Option<CredentialReference>,
    /// Set when resolution itself failed; the caller may render it and
    /// retry the lookup.
    pub failure: Option<VerificationOutcome>,
}

impl ResolvedEnrollment {
    fn new(session_id: &str, state: EnrollmentState) -> Self {
        Self {
            session_id: session_id.to_string(),
            state,
            credential: None,
            failure: None,
        }
    }
}

/// Drives the enrollment-or-verification ceremony against the local
/// authenticator and submits the encoded proof for remote validation.
pub struct CredentialCeremonyOrchestrator {
    config: GateConfig,
    authenticator: Arc<dyn CredentialAuthenticator>,
    validator: Arc<dyn CredentialValidator>,
}

impl CredentialCeremonyOrchestrator {
    pub fn new(
        config: GateConfig,
        authenticator: Arc<dyn CredentialAuthenticator>,
        validator: Arc<dyn CredentialValidator>,
    ) -> Self {
        Self {
            config,
            authenticator,
            validator,
        }
    }

    /// Resolve the session's enrollment state from the remote lookup.
    ///
    /// A transport failure yields `Unknown` with an error outcome in
    /// `failure` rather than a fatal abort, so the caller can retry.
    #[instrument(level = "info", skip(self))]
    pub async fn resolve_enrollment(&self, session_id: &str) -> ResolvedEnrollment {
        if !self.authenticator.is_supported() {
            warn!("no platform authenticator capability; ceremony unavailable");
            let mut resolved = ResolvedEnrollment::new(session_id, EnrollmentState::Unsupported);
            resolved.failure = Some(VerificationOutcome::error(
                "fingerprint verification is not supported on this device",
            ));
            return resolved;
        }

        match self.validator.lookup_credential(session_id).await {
            Ok(Some(credential)) => {
                info!("existing credential found; session is enrolled");
                let mut resolved = ResolvedEnrollment::new(session_id, EnrollmentState::Enrolled);
                resolved.credential = Some(credential);
                resolved
            }
            Ok(None) => {
                info!("no credential on record; session needs enrollment");
                ResolvedEnrollment::new(session_id, EnrollmentState::NotEnrolled)
            }
            Err(e) => {
                warn!(error = %e, "enrollment lookup failed");
                let mut resolved = ResolvedEnrollment::new(session_id, EnrollmentState::Unknown);
                resolved.failure = Some(VerificationOutcome::error(
                    "could not check enrollment status",
                ));
                resolved
            }
        }
    }

    /// Run one ceremony attempt for the resolved session.
    ///
    /// Takes `&mut self`: at most one ceremony is in flight per
    /// orchestrator, driven by a single user action.
    #[instrument(
        level = "info",
        skip(self, resolved),
        fields(
            session_id = %resolved.session_id,
            state = ?resolved.state,
            attempt_id = %Uuid::new_v4(),
        )
    )]
    pub async fn run_ceremony(&mut self, resolved: &ResolvedEnrollment) -> VerificationOutcome {
        match resolved.state {
            EnrollmentState::NotEnrolled => self.enroll(resolved).await,
            EnrollmentState::Enrolled => self.verify(resolved).await,
            EnrollmentState::Unsupported => VerificationOutcome::error(
                "fingerprint verification is not supported on this device",
            ),
            EnrollmentState::Unknown => VerificationOutcome::error(
                "enrollment status is unknown; check the connection and try again",
            ),
        }
    }

    /// One-time enrollment: the create ceremony. No credential reference
    /// is read or required on this path.
    async fn enroll(&self, resolved: &ResolvedEnrollment) -> VerificationOutcome {
        let challenge = match Challenge::generate() {
            Ok(challenge) => challenge,
            Err(e) => return VerificationOutcome::error(format!("cannot start ceremony: {e}")),
        };

        let request = CreationRequest {
            challenge,
            relying_party: RelyingParty {
                id: self.config.rp_id.clone(),
                name: self.config.rp_name.clone(),
            },
            user: UserIdentity::for_session(&resolved.session_id),
            algorithms: vec![COSE_ES256],
            selection: AuthenticatorSelection::default(),
            timeout_ms: self.config.ceremony_timeout_ms,
        };

        match self.authenticator.create(request).await {
            Ok(result) => self.submit(resolved, result).await,
            Err(e) => Self::authenticator_outcome(e),
        }
    }

    /// Real-time verification: the get ceremony against the stored
    /// credential.
    async fn verify(&self, resolved: &ResolvedEnrollment) -> VerificationOutcome {
        let Some(credential) = &resolved.credential else {
            return VerificationOutcome::error("no stored credential for this session");
        };

        let raw_id = match credential.raw() {
            Ok(raw_id) => raw_id,
            Err(e) => {
                warn!(error = %e, "stored credential reference is not valid transport form");
                return VerificationOutcome::error("stored credential is unreadable");
            }
        };

        let challenge = match Challenge::generate() {
            Ok(challenge) => challenge,
            Err(e) => return VerificationOutcome::error(format!("cannot start ceremony: {e}")),
        };

        let request = AssertionRequest {
            challenge,
            rp_id: self.config.rp_id.clone(),
            allow_credentials: vec![raw_id],
            user_verification_required: true,
            timeout_ms: self.config.ceremony_timeout_ms,
        };

        match self.authenticator.get(request).await {
            Ok(result) => self.submit(resolved, result).await,
            Err(e) => Self::authenticator_outcome(e),
        }
    }

    /// Serialize the captured proof and submit it for remote validation.
    async fn submit(
        &self,
        resolved: &ResolvedEnrollment,
        result: CeremonyResult,
    ) -> VerificationOutcome {
        let request = ValidationRequest {
            session_id: resolved.session_id.clone(),
            ceremony: result.ceremony_type(),
            credential: result.encode(),
            device_context: device_context(&self.config.rp_origin),
        };
        let ceremony = request.ceremony;

        match self.validator.validate(request).await {
            Ok(response) if response.validation_passed => {
                info!(?ceremony, "ceremony proof accepted by validator");
                VerificationOutcome::accepted("fingerprint verified")
            }
            Ok(response) => {
                // Mechanical success, proof not accepted: a rejection.
                let reason = response
                    .error_message
                    .unwrap_or_else(|| "the proof was not accepted".to_string());
                warn!(?ceremony, %reason, "ceremony proof rejected by validator");
                VerificationOutcome::rejected(reason)
            }
            Err(e) => {
                warn!(?ceremony, error = %e, "validation request failed");
                VerificationOutcome::error(format!("validation request failed: {e}"))
            }
        }
    }

    fn authenticator_outcome(error: AuthenticatorError) -> VerificationOutcome {
        match error {
            AuthenticatorError::Cancelled | AuthenticatorError::Timeout => {
                VerificationOutcome::error("verification was cancelled; please try again")
            }
            AuthenticatorError::Unsupported => VerificationOutcome::error(
                "fingerprint verification is not supported on this device",
            ),
            AuthenticatorError::Platform(message) => VerificationOutcome::error(format!(
                "the authenticator reported a problem: {message}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::credential::scripted::{ScriptedAuthenticator, ScriptedValidator};
    use crate::credential::types::CeremonyType;
    use crate::outcome::OutcomeStatus;

    fn orchestrator(
        authenticator: Arc<ScriptedAuthenticator>,
        validator: Arc<ScriptedValidator>,
    ) -> CredentialCeremonyOrchestrator {
        CredentialCeremonyOrchestrator::new(GateConfig::default(), authenticator, validator)
    }

    #[tokio::test]
    async fn resolves_not_enrolled_without_credential() {
        let orchestrator = orchestrator(
            Arc::new(ScriptedAuthenticator::succeeding()),
            Arc::new(ScriptedValidator::passing()),
        );

        let resolved = orchestrator.resolve_enrollment("REQ-001").await;
        assert_eq!(resolved.state, EnrollmentState::NotEnrolled);
        assert!(resolved.credential.is_none());
        assert!(resolved.failure.is_none());
    }

    #[tokio::test]
    async fn resolves_enrolled_with_stored_credential() {
        let credential = CredentialReference::from_raw(&[9, 9, 9]);
        let validator =
            Arc::new(ScriptedValidator::passing().with_credential(credential.clone()));
        let orchestrator =
            orchestrator(Arc::new(ScriptedAuthenticator::succeeding()), validator);

        let resolved = orchestrator.resolve_enrollment("REQ-001").await;
        assert_eq!(resolved.state, EnrollmentState::Enrolled);
        assert_eq!(resolved.credential, Some(credential));
    }

    #[tokio::test]
    async fn lookup_transport_failure_resolves_unknown_with_error() {
        let orchestrator = orchestrator(
            Arc::new(ScriptedAuthenticator::succeeding()),
            Arc::new(ScriptedValidator::passing().with_failing_lookup()),
        );

        let resolved = orchestrator.resolve_enrollment("REQ-001").await;
        assert_eq!(resolved.state, EnrollmentState::Unknown);
        let failure = resolved.failure.expect("failure outcome must be available");
        assert_eq!(failure.status, OutcomeStatus::Error);
    }

    #[tokio::test]
    async fn unsupported_platform_is_terminal_and_never_runs_a_ceremony() {
        let authenticator = Arc::new(ScriptedAuthenticator::unsupported());
        let validator = Arc::new(ScriptedValidator::passing());
        let mut orchestrator = orchestrator(authenticator.clone(), validator.clone());

        let resolved = orchestrator.resolve_enrollment("REQ-001").await;
        assert_eq!(resolved.state, EnrollmentState::Unsupported);

        let outcome = orchestrator.run_ceremony(&resolved).await;
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert_eq!(authenticator.create_calls.load(Ordering::SeqCst), 0);
        assert_eq!(authenticator.get_calls.load(Ordering::SeqCst), 0);
        // The lookup never ran either.
        assert_eq!(validator.lookup_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn enrollment_path_submits_an_enroll_payload() {
        let authenticator = Arc::new(ScriptedAuthenticator::succeeding());
        let validator = Arc::new(ScriptedValidator::passing());
        let mut orchestrator = orchestrator(authenticator.clone(), validator.clone());

        let resolved = ResolvedEnrollment::new("REQ-001", EnrollmentState::NotEnrolled);
        let outcome = orchestrator.run_ceremony(&resolved).await;

        assert_eq!(outcome.status, OutcomeStatus::Accepted);
        assert_eq!(authenticator.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(authenticator.get_calls.load(Ordering::SeqCst), 0);

        let requests = validator.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].ceremony, CeremonyType::Enroll);
        assert_eq!(requests[0].session_id, "REQ-001");
        assert!(requests[0].credential.response.attestation_object.is_some());
    }

    #[tokio::test]
    async fn verification_path_signs_with_the_stored_credential() {
        let stored_raw = vec![4, 4, 4, 4];
        let authenticator = Arc::new(ScriptedAuthenticator::succeeding());
        let validator = Arc::new(
            ScriptedValidator::passing()
                .with_credential(CredentialReference::from_raw(&stored_raw)),
        );
        let mut orchestrator = orchestrator(authenticator.clone(), validator.clone());

        let resolved = orchestrator.resolve_enrollment("REQ-002").await;
        let outcome = orchestrator.run_ceremony(&resolved).await;

        assert_eq!(outcome.status, OutcomeStatus::Accepted);
        assert_eq!(authenticator.get_calls.load(Ordering::SeqCst), 1);

        let requests = validator.requests.lock().unwrap();
        assert_eq!(requests[0].ceremony, CeremonyType::Verify);
        // The assertion is bound to the decoded stored credential.
        assert_eq!(
            requests[0].credential.raw_id,
            crate::codec::encode(&stored_raw)
        );
    }

    #[tokio::test]
    async fn rejected_validation_maps_to_rejected_not_error() {
        let validator = Arc::new(ScriptedValidator::rejecting("signature mismatch"));
        let mut orchestrator =
            orchestrator(Arc::new(ScriptedAuthenticator::succeeding()), validator);

        let resolved = ResolvedEnrollment::new("REQ-001", EnrollmentState::NotEnrolled);
        let outcome = orchestrator.run_ceremony(&resolved).await;

        assert_eq!(outcome.status, OutcomeStatus::Rejected);
        assert_eq!(outcome.reason, "signature mismatch");
    }

    #[tokio::test]
    async fn cancellation_is_an_error_and_skips_the_validator() {
        let validator = Arc::new(ScriptedValidator::passing());
        let mut orchestrator = orchestrator(
            Arc::new(ScriptedAuthenticator::failing(AuthenticatorError::Cancelled)),
            validator.clone(),
        );

        let resolved = ResolvedEnrollment::new("REQ-001", EnrollmentState::NotEnrolled);
        let outcome = orchestrator.run_ceremony(&resolved).await;

        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert!(outcome.reason.contains("try again"));
        assert_eq!(validator.validate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn retry_reuses_the_resolved_state_with_a_fresh_challenge() {
        let authenticator = Arc::new(ScriptedAuthenticator::succeeding());
        let validator = Arc::new(ScriptedValidator::passing());
        let mut orchestrator = orchestrator(authenticator.clone(), validator.clone());

        let resolved = ResolvedEnrollment::new("REQ-001", EnrollmentState::NotEnrolled);
        orchestrator.run_ceremony(&resolved).await;
        orchestrator.run_ceremony(&resolved).await;

        assert_eq!(authenticator.create_calls.load(Ordering::SeqCst), 2);
        let requests = validator.requests.lock().unwrap();
        // Challenge-derived fake proofs differ, so the challenge was fresh.
        assert_ne!(requests[0].credential.raw_id, requests[1].credential.raw_id);
    }

    #[test]
    fn device_context_is_stable_per_origin() {
        let origin = Url::parse("https://sign.example.com").unwrap();
        assert_eq!(device_context(&origin), device_context(&origin));
        assert_ne!(
            device_context(&origin),
            device_context(&Url::parse("https://other.example.com").unwrap())
        );
    }
}
