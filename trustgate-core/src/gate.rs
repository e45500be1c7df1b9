//! Signing gate consumed by the host signature workflow.
//!
//! The workflow polls the gate as a precondition for submitting the
//! signature. The gate aggregates per-check outcomes and raises the
//! outbound `GateEvent { verified: true }` notification exactly once.

use std::sync::Arc;

use tracing::info;

use crate::outcome::{GateEvent, VerificationOutcome};

/// Biometric check feeding the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCheck {
    Fingerprint,
    Face,
}

/// Consumer of the outbound verification notification.
pub trait VerificationSink: Send + Sync {
    fn notify(&self, event: GateEvent);
}

/// Tracks which required checks have been accepted for one signing
/// session and notifies the sink once all of them have.
pub struct SigningGate {
    required: Vec<GateCheck>,
    passed: Vec<GateCheck>,
    sink: Arc<dyn VerificationSink>,
    notified: bool,
}

impl SigningGate {
    pub fn new(required: Vec<GateCheck>, sink: Arc<dyn VerificationSink>) -> Self {
        Self {
            required,
            passed: Vec::new(),
            sink,
            notified: false,
        }
    }

    /// Record the outcome of one check attempt. Returns `true` when this
    /// call raised the notification.
    pub fn record(&mut self, check: GateCheck, outcome: &VerificationOutcome) -> bool {
        if outcome.is_accepted() && !self.passed.contains(&check) {
            self.passed.push(check);
        }

        if self.is_satisfied() && !self.notified {
            self.notified = true;
            info!(?check, "signing gate satisfied; notifying host workflow");
            self.sink.notify(GateEvent { verified: true });
            return true;
        }
        false
    }

    /// Whether every required check has an accepted outcome.
    pub fn is_satisfied(&self) -> bool {
        self.required.iter().all(|check| self.passed.contains(check))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::outcome::VerificationOutcome;

    #[derive(Default)]
    struct CountingSink {
        events: AtomicUsize,
    }

    impl VerificationSink for CountingSink {
        fn notify(&self, event: GateEvent) {
            assert!(event.verified);
            self.events.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn notifies_exactly_once_per_success() {
        let sink = Arc::new(CountingSink::default());
        let mut gate = SigningGate::new(vec![GateCheck::Fingerprint], sink.clone());

        assert!(gate.record(
            GateCheck::Fingerprint,
            &VerificationOutcome::accepted("ok")
        ));
        // A second accepted attempt must not notify again.
        assert!(!gate.record(
            GateCheck::Fingerprint,
            &VerificationOutcome::accepted("ok")
        ));
        assert_eq!(sink.events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rejected_and_error_outcomes_never_notify() {
        let sink = Arc::new(CountingSink::default());
        let mut gate = SigningGate::new(vec![GateCheck::Face], sink.clone());

        gate.record(GateCheck::Face, &VerificationOutcome::rejected("no match"));
        gate.record(GateCheck::Face, &VerificationOutcome::error("camera"));

        assert!(!gate.is_satisfied());
        assert_eq!(sink.events.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn waits_for_every_required_check() {
        let sink = Arc::new(CountingSink::default());
        let mut gate = SigningGate::new(
            vec![GateCheck::Fingerprint, GateCheck::Face],
            sink.clone(),
        );

        assert!(!gate.record(
            GateCheck::Fingerprint,
            &VerificationOutcome::accepted("ok")
        ));
        assert!(!gate.is_satisfied());
        assert!(gate.record(GateCheck::Face, &VerificationOutcome::accepted("ok")));
        assert!(gate.is_satisfied());
        assert_eq!(sink.events.load(Ordering::SeqCst), 1);
    }
}
