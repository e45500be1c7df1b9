//! Data model for the credential ceremony.
//!
//! Binary fields are owned exclusively by the result that captured them
//! and are never mutated after capture; they cross the network boundary
//! only through the transport-safe `codec` form.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{GateError, Result};

/// Challenge length in bytes. 256 bits of fresh OS randomness per attempt.
pub const CHALLENGE_LEN: usize = 32;

/// COSE algorithm identifier for ES256, the single supported algorithm.
pub const COSE_ES256: i32 = -7;

/// Whether a credential already exists for the signing session.
///
/// Resolved once per session from the enrollment lookup; immutable for
/// the session once resolved. `Unsupported` is terminal: no ceremony is
/// ever attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentState {
    /// The lookup failed; the caller may retry resolution.
    Unknown,
    /// A credential exists; run the verification (get) ceremony.
    Enrolled,
    /// No credential yet; run the enrollment (create) ceremony.
    NotEnrolled,
    /// No platform authenticator capability. Terminal for the session.
    Unsupported,
}

/// Opaque credential identifier in transport form (base64url, no
/// padding), as returned by the remote party when a credential exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialReference(pub String);

impl CredentialReference {
    /// Build the transport form from raw credential bytes.
    pub fn from_raw(bytes: &[u8]) -> Self {
        Self(codec::encode(bytes))
    }

    /// Decode back to the raw bytes the authenticator API expects.
    pub fn raw(&self) -> Result<Vec<u8>> {
        codec::decode(&self.0)
    }
}

/// Single-use random challenge.
///
/// Generated immediately before invoking the authenticator and discarded
/// with the attempt, whether it succeeds or fails. Never reused.
pub struct Challenge(Vec<u8>);

impl Challenge {
    /// Generate `CHALLENGE_LEN` bytes of OS randomness.
    pub fn generate() -> Result<Self> {
        let mut bytes = vec![0u8; CHALLENGE_LEN];
        getrandom::fill(&mut bytes)
            .map_err(|e| GateError::Precondition(format!("no randomness source available: {e}")))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Challenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Challenge")
            .field(&format!("{} bytes", self.0.len()))
            .finish()
    }
}

/// Relying-party identity the ceremony is bound to.
#[derive(Debug, Clone)]
pub struct RelyingParty {
    pub id: String,
    pub name: String,
}

/// User identity derived deterministically from the signing session.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    /// Byte handle the authenticator associates with the key pair.
    pub handle: Vec<u8>,
    pub name: String,
    pub display_name: String,
}

impl UserIdentity {
    /// Derive the identity for a session. Deterministic so a retried
    /// enrollment targets the same user slot.
    pub fn for_session(session_id: &str) -> Self {
        Self {
            handle: session_id.as_bytes().to_vec(),
            name: format!("signer-{session_id}"),
            display_name: format!("Signer {session_id}"),
        }
    }
}

/// Authenticator preferences for enrollment: a platform-bound
/// authenticator with user verification required.
#[derive(Debug, Clone)]
pub struct AuthenticatorSelection {
    pub platform_attachment: bool,
    pub user_verification_required: bool,
    pub resident_key_preferred: bool,
}

impl Default for AuthenticatorSelection {
    fn default() -> Self {
        Self {
            platform_attachment: true,
            user_verification_required: true,
            resident_key_preferred: true,
        }
    }
}

/// Request driving the authenticator's create (enrollment) ceremony.
#[derive(Debug)]
pub struct CreationRequest {
    pub challenge: Challenge,
    pub relying_party: RelyingParty,
    pub user: UserIdentity,
    /// Supported COSE algorithm identifiers, in preference order.
    pub algorithms: Vec<i32>,
    pub selection: AuthenticatorSelection,
    pub timeout_ms: u32,
}

/// Request driving the authenticator's get (verification) ceremony.
#[derive(Debug)]
pub struct AssertionRequest {
    pub challenge: Challenge,
    pub rp_id: String,
    /// Raw credential ids the authenticator may answer with.
    pub allow_credentials: Vec<Vec<u8>>,
    pub user_verification_required: bool,
    pub timeout_ms: u32,
}

/// Ceremony type as understood by the remote validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CeremonyType {
    Enroll,
    Verify,
}

/// Binary proof captured from a completed ceremony.
#[derive(Debug, Clone)]
pub enum CeremonyResult {
    /// Proof of a create ceremony: a newly minted key pair.
    Attestation {
        credential_id: String,
        raw_id: Vec<u8>,
        attestation_object: Vec<u8>,
        client_data_json: Vec<u8>,
    },
    /// Proof of a get ceremony: a challenge signed with an existing key.
    Assertion {
        credential_id: String,
        raw_id: Vec<u8>,
        authenticator_data: Vec<u8>,
        client_data_json: Vec<u8>,
        signature: Vec<u8>,
        user_handle: Option<Vec<u8>>,
    },
}

impl CeremonyResult {
    /// The validator-side ceremony type this proof belongs to.
    pub fn ceremony_type(&self) -> CeremonyType {
        match self {
            Self::Attestation { .. } => CeremonyType::Enroll,
            Self::Assertion { .. } => CeremonyType::Verify,
        }
    }

    /// Serialize into the transport-safe wire form. Every byte field is
    /// base64url-encoded without padding.
    pub fn encode(&self) -> EncodedCeremony {
        match self {
            Self::Attestation {
                credential_id,
                raw_id,
                attestation_object,
                client_data_json,
            } => EncodedCeremony {
                id: credential_id.clone(),
                raw_id: codec::encode(raw_id),
                credential_type: "public-key".to_string(),
                response: EncodedCeremonyResponse {
                    attestation_object: Some(codec::encode(attestation_object)),
                    client_data_json: Some(codec::encode(client_data_json)),
                    ..Default::default()
                },
            },
            Self::Assertion {
                credential_id,
                raw_id,
                authenticator_data,
                client_data_json,
                signature,
                user_handle,
            } => EncodedCeremony {
                id: credential_id.clone(),
                raw_id: codec::encode(raw_id),
                credential_type: "public-key".to_string(),
                response: EncodedCeremonyResponse {
                    authenticator_data: Some(codec::encode(authenticator_data)),
                    client_data_json: Some(codec::encode(client_data_json)),
                    signature: Some(codec::encode(signature)),
                    user_handle: user_handle.as_deref().map(codec::encode),
                    ..Default::default()
                },
            },
        }
    }
}

/// Wire form of a ceremony result, submitted to the remote validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedCeremony {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    pub response: EncodedCeremonyResponse,
}

/// Encoded authenticator response; fields absent when not produced by
/// the ceremony kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedCeremonyResponse {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attestation_object: Option<String>,
    #[serde(
        rename = "clientDataJSON",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub client_data_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub authenticator_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_handle: Option<String>,
}
