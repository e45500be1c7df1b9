//! Local authenticator capability seam.
//!
//! The orchestrator never talks to platform credential APIs directly; it
//! goes through this trait so ceremony logic is testable without real
//! hardware.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{AssertionRequest, CeremonyResult, CreationRequest};

/// Failure surfaced by the platform authenticator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticatorError {
    /// The user dismissed the ceremony prompt.
    #[error("ceremony cancelled by the user")]
    Cancelled,

    /// The platform's bounded wait elapsed before the user responded.
    #[error("ceremony timed out waiting for the authenticator")]
    Timeout,

    /// No platform authenticator capability on this device.
    #[error("no platform authenticator available")]
    Unsupported,

    /// Any other platform-level failure.
    #[error("authenticator failure: {0}")]
    Platform(String),
}

/// Narrow seam over the platform's create/get credential ceremonies.
///
/// A started ceremony runs to completion, user cancellation, or the
/// platform timeout; there is no programmatic mid-ceremony abort.
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait CredentialAuthenticator: Send + Sync {
    /// Whether a platform authenticator is available at all. Checked once
    /// at activation; a `false` answer is terminal for the session.
    fn is_supported(&self) -> bool;

    /// Run the create (enrollment) ceremony, minting a new key pair.
    async fn create(
        &self,
        request: CreationRequest,
    ) -> std::result::Result<CeremonyResult, AuthenticatorError>;

    /// Run the get (verification) ceremony, signing the challenge with an
    /// existing credential.
    async fn get(
        &self,
        request: AssertionRequest,
    ) -> std::result::Result<CeremonyResult, AuthenticatorError>;
}
