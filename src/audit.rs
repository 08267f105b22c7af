//! Audit trail of access decisions.
//!
//! Every operation the store attempts produces one [`AuditEvent`], whether
//! it was permitted or denied. Events carry identifiers only, never field
//! values.

mod event;
mod trail;

pub use event::{AuditEvent, AuditEventKind, AuditOutcome};
pub use trail::AuditTrail;
