use thiserror::Error;

use crate::credential::AuthenticatorError;

/// Top-level error type for the trust gates.
///
/// A rejected proof is never an error: rejection is an outcome status
/// (`OutcomeStatus::Rejected`). Errors cover the precondition and
/// transport/platform kinds only.
#[derive(Debug, Error)]
pub enum GateError {
    /// Device, permission, or readiness precondition not satisfied.
    /// Nothing was attempted remotely.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// The platform cannot run the requested check at all. Terminal for
    /// the session.
    #[error("platform unsupported: {0}")]
    Unsupported(String),

    /// The local authenticator ceremony failed or was cancelled.
    #[error("authenticator error: {0}")]
    Authenticator(#[from] AuthenticatorError),

    /// A transport-form value could not be decoded.
    #[error("codec error: {0}")]
    Codec(String),

    /// A captured frame could not be encoded as a still image.
    #[error("image encoding error: {0}")]
    Image(String),

    /// A remote collaborator answered with an unusable response.
    #[error("remote service error: {0}")]
    Service(String),

    /// Network-level failure talking to a remote collaborator.
    #[cfg(feature = "network")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, GateError>;
