//! Audit event schema.

use std::fmt;

use crate::policy::{DenyReason, Operation};

/// Store operation that produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    /// Document fetch
    Get,
    /// Document create or replace
    Set,
    /// Document removal
    Delete,
}

impl AuditEventKind {
    /// Returns the access operation this kind is checked as.
    pub fn operation(&self) -> Operation {
        match self {
            AuditEventKind::Get => Operation::Read,
            AuditEventKind::Set | AuditEventKind::Delete => Operation::Write,
        }
    }
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEventKind::Get => write!(f, "get"),
            AuditEventKind::Set => write!(f, "set"),
            AuditEventKind::Delete => write!(f, "delete"),
        }
    }
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Rules permitted the operation
    Permitted,
    /// Rules denied the operation
    Denied(DenyReason),
    /// Operation failed before or after the rules check
    Error,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Permitted => write!(f, "permitted"),
            AuditOutcome::Denied(_) => write!(f, "denied"),
            AuditOutcome::Error => write!(f, "error"),
        }
    }
}

/// A structured record of one store operation.
///
/// # Example
///
/// ```
/// use billwise_rules::audit::{AuditEvent, AuditEventKind, AuditOutcome};
///
/// let event = AuditEvent::new(
///     "req-123",
///     Some("alice"),
///     AuditEventKind::Get,
///     "Bills/testBill",
///     AuditOutcome::Permitted,
/// );
///
/// assert_eq!(event.request_id(), "req-123");
/// assert_eq!(event.principal(), Some("alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    request_id: String,
    /// None for unauthenticated callers
    principal: Option<String>,
    kind: AuditEventKind,
    path: String,
    outcome: AuditOutcome,
}

impl AuditEvent {
    /// Creates a new audit event.
    pub fn new(
        request_id: impl Into<String>,
        principal: Option<impl Into<String>>,
        kind: AuditEventKind,
        path: impl Into<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            principal: principal.map(Into::into),
            kind,
            path: path.into(),
            outcome,
        }
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the principal, if authenticated.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Returns the event kind.
    pub fn kind(&self) -> AuditEventKind {
        self.kind
    }

    /// Returns the target document path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the operation outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[kind={}, outcome={}, request_id={}, principal={}, path={}",
            self.kind,
            self.outcome,
            self.request_id,
            self.principal.as_deref().unwrap_or("<none>"),
            self.path,
        )?;

        if let AuditOutcome::Denied(reason) = self.outcome {
            write!(f, ", reason={}", reason)?;
        }

        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_to_operation() {
        assert_eq!(AuditEventKind::Get.operation(), Operation::Read);
        assert_eq!(AuditEventKind::Set.operation(), Operation::Write);
        assert_eq!(AuditEventKind::Delete.operation(), Operation::Write);
    }

    #[test]
    fn display_includes_denial_reason() {
        let event = AuditEvent::new(
            "req-7",
            Some("bob"),
            AuditEventKind::Get,
            "Bills/testBill",
            AuditOutcome::Denied(DenyReason::NotOwner),
        );

        let display = event.to_string();
        assert!(display.contains("outcome=denied"));
        assert!(display.contains("principal=bob"));
        assert!(display.contains("reason=principal is not the document owner"));
    }

    #[test]
    fn unauthenticated_event_displays_none() {
        let event = AuditEvent::new(
            "req-anon",
            None::<String>,
            AuditEventKind::Set,
            "Bills/testBill",
            AuditOutcome::Denied(DenyReason::Unauthenticated),
        );

        assert!(event.principal().is_none());
        assert!(event.to_string().contains("<none>"));
    }
}
