//! Uniform verification outcome shared by both trust gates.

use serde::{Deserialize, Serialize};

/// Terminal status of a single verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The proof satisfied the trust check.
    Accepted,
    /// The attempt mechanically completed but the proof did not satisfy
    /// the check. Retryable with a fresh challenge or capture.
    Rejected,
    /// The attempt could not complete: device, platform, or transport
    /// fault.
    Error,
}

/// The result of one ceremony or capture-compare attempt, consumed by the
/// signing workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub status: OutcomeStatus,
    /// Human-readable reason, suitable for rendering to the signer.
    pub reason: String,
    /// Reference to the persisted proof. Present only on accepted
    /// outcomes; nothing is stored for rejections or errors.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub evidence_id: Option<String>,
}

impl VerificationOutcome {
    pub fn accepted(reason: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Accepted,
            reason: reason.into(),
            evidence_id: None,
        }
    }

    pub fn accepted_with_evidence(reason: impl Into<String>, evidence_id: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Accepted,
            reason: reason.into(),
            evidence_id: Some(evidence_id.into()),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Rejected,
            reason: reason.into(),
            evidence_id: None,
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Error,
            reason: reason.into(),
            evidence_id: None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == OutcomeStatus::Accepted
    }
}

/// Notification raised to the host signature workflow, exactly once per
/// satisfied gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateEvent {
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evidence_only_on_accepted_constructor() {
        assert!(VerificationOutcome::accepted_with_evidence("ok", "ev-1")
            .evidence_id
            .is_some());
        assert!(VerificationOutcome::rejected("no").evidence_id.is_none());
        assert!(VerificationOutcome::error("boom").evidence_id.is_none());
    }

    #[test]
    fn status_serialization() {
        let json = serde_json::to_string(&OutcomeStatus::Accepted).unwrap();
        assert_eq!(json, "\"accepted\"");
    }

    #[test]
    fn outcome_omits_absent_evidence() {
        let json = serde_json::to_string(&VerificationOutcome::rejected("no match")).unwrap();
        assert!(!json.contains("evidence_id"));
    }
}
