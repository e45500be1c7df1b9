//! Credential ceremony trust gate.
//!
//! Drives an enrollment-or-verification ceremony against a local
//! public-key authenticator and exchanges its binary artifacts with a
//! remote validator.
//!
//! ## Architecture
//!
//! - `types`: challenge, ceremony requests/results, and their wire forms
//! - `authenticator`: narrow seam over the platform create/get ceremonies
//! - `validator`: remote enrollment-lookup and validation contract
//! - `orchestrator`: the `{Init} -> resolve -> ceremony -> outcome` state
//!   machine
//! - `scripted`: deterministic fakes for tests

pub mod authenticator;
pub mod orchestrator;
pub mod scripted;
pub mod types;
pub mod validator;

pub use authenticator::{AuthenticatorError, CredentialAuthenticator};
pub use orchestrator::{device_context, CredentialCeremonyOrchestrator, ResolvedEnrollment};
pub use scripted::{ScriptedAuthenticator, ScriptedValidator};
pub use types::{
    AssertionRequest, AuthenticatorSelection, CeremonyResult, CeremonyType, Challenge,
    CreationRequest, CredentialReference, EncodedCeremony, EncodedCeremonyResponse,
    EnrollmentState, RelyingParty, UserIdentity, CHALLENGE_LEN, COSE_ES256,
};
pub use validator::{CredentialValidator, ValidationRequest, ValidationResponse};
