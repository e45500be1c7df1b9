//! TrustGate Core - biometric trust gates for e-signature workflows
//!
//! A signer completes an e-signature only after passing one or more
//! biometric trust gates. This crate provides the two gate flows and the
//! uniform outcome the signing workflow consumes:
//!
//! - [`CredentialCeremonyOrchestrator`] drives an enrollment-or-verification
//!   ceremony against a local public-key authenticator and exchanges its
//!   binary artifacts, base64url-encoded, with a remote validator.
//! - [`FaceMatchVerifier`] captures one still frame from a live video
//!   source, exchanges it for a face descriptor token, and applies a
//!   confidence-threshold accept/reject decision, persisting evidence only
//!   on acceptance.
//!
//! Device and remote collaborators sit behind narrow capability traits
//! ([`CredentialAuthenticator`], [`VideoFrameSource`], [`FaceExchange`],
//! [`CredentialValidator`]), so both flows run against scripted fakes in
//! tests. HTTP clients for the real collaborators live behind the
//! `network` feature.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use trustgate_core::credential::{
//!     CredentialCeremonyOrchestrator, ScriptedAuthenticator, ScriptedValidator,
//! };
//! use trustgate_core::GateConfig;
//!
//! # async fn example() {
//! let mut orchestrator = CredentialCeremonyOrchestrator::new(
//!     GateConfig::default(),
//!     Arc::new(ScriptedAuthenticator::succeeding()),
//!     Arc::new(ScriptedValidator::passing()),
//! );
//!
//! // Resolve once per session, then run ceremony attempts from the
//! // resolved state.
//! let resolved = orchestrator.resolve_enrollment("REQ-001").await;
//! let outcome = orchestrator.run_ceremony(&resolved).await;
//! assert!(outcome.is_accepted());
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod credential;
pub mod error;
pub mod face;
pub mod gate;
pub mod outcome;

#[cfg(feature = "network")]
pub mod services;

// Re-export main types for convenience
pub use config::GateConfig;
pub use credential::{
    CredentialAuthenticator, CredentialCeremonyOrchestrator, CredentialReference,
    CredentialValidator, EnrollmentState, ResolvedEnrollment,
};
pub use error::{GateError, Result};
pub use face::{FaceExchange, FaceMatchVerifier, FaceToken, VideoFrameSource};
pub use gate::{GateCheck, SigningGate, VerificationSink};
pub use outcome::{GateEvent, OutcomeStatus, VerificationOutcome};

#[cfg(feature = "network")]
pub use services::{FaceServiceClient, ValidatorClient};
