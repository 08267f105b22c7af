//! In-memory audit trail recorder.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{AuditEvent, AuditOutcome};

/// In-memory recorder for audit events.
///
/// Recording also emits the event through `tracing` under the
/// `billwise_audit` target. Safe to share between threads.
///
/// # Example
///
/// ```
/// use billwise_rules::audit::{AuditTrail, AuditEvent, AuditEventKind, AuditOutcome};
///
/// let trail = AuditTrail::new();
///
/// trail.record(AuditEvent::new(
///     "req-123",
///     Some("alice"),
///     AuditEventKind::Set,
///     "Bills/testBill",
///     AuditOutcome::Permitted,
/// ));
///
/// assert_eq!(trail.events().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AuditTrail {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditTrail {
    /// Creates a new empty audit trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits and records an audit event.
    ///
    /// Events are stored in the order they are recorded.
    pub fn record(&self, event: AuditEvent) {
        match event.outcome() {
            AuditOutcome::Permitted => tracing::info!(
                target: "billwise_audit",
                request_id = %event.request_id(),
                principal = ?event.principal(),
                kind = %event.kind(),
                path = %event.path(),
                outcome = %event.outcome(),
                "audit event"
            ),
            _ => tracing::warn!(
                target: "billwise_audit",
                request_id = %event.request_id(),
                principal = ?event.principal(),
                kind = %event.kind(),
                path = %event.path(),
                outcome = %event.outcome(),
                "audit event"
            ),
        }
        self.lock().push(event);
    }

    /// Returns a snapshot of all recorded events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.lock().clone()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock leaves a valid Vec behind.
    fn lock(&self) -> MutexGuard<'_, Vec<AuditEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
