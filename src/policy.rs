//! The owner-only access predicate.
//!
//! A principal may read or write a document only when it is authenticated
//! and its id equals the document's owner id. Denial is an ordinary outcome
//! here, never an error: every input maps to a [`Decision`].

use std::fmt;

use crate::request::Principal;

/// Kind of access being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Fetch a document
    Read,
    /// Create, replace or delete a document
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "read"),
            Operation::Write => write!(f, "write"),
        }
    }
}

/// Why an access request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No principal, or a principal with an empty id
    Unauthenticated,
    /// The principal does not own the document
    NotOwner,
    /// The collection has no rule, so nothing is allowed
    NoMatchingRule,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::Unauthenticated => write!(f, "unauthenticated"),
            DenyReason::NotOwner => write!(f, "principal is not the document owner"),
            DenyReason::NoMatchingRule => write!(f, "no rule matches the collection"),
        }
    }
}

/// Outcome of evaluating an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Access granted
    Permitted,
    /// Access refused
    Denied(DenyReason),
}

impl Decision {
    /// Returns `true` for [`Decision::Permitted`].
    pub fn is_permitted(&self) -> bool {
        matches!(self, Decision::Permitted)
    }

    /// Returns the denial reason, if any.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Permitted => None,
            Decision::Denied(reason) => Some(*reason),
        }
    }
}

/// A (principal, owner, operation) triple awaiting evaluation.
///
/// # Examples
///
/// ```
/// use billwise_rules::{AccessRequest, Operation, Principal};
///
/// let alice = Principal::new("alice");
/// let request = AccessRequest::new(Some(&alice), "alice", Operation::Read);
/// assert!(request.evaluate());
///
/// let request = AccessRequest::new(None, "alice", Operation::Write);
/// assert!(!request.evaluate());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    /// Requesting principal, `None` when unauthenticated
    pub principal: Option<&'a Principal>,
    /// Owner id recorded on the target document
    pub owner_id: &'a str,
    /// Requested operation
    pub operation: Operation,
}

impl<'a> AccessRequest<'a> {
    /// Creates a new access request.
    pub fn new(
        principal: Option<&'a Principal>,
        owner_id: &'a str,
        operation: Operation,
    ) -> Self {
        Self {
            principal,
            owner_id,
            operation,
        }
    }

    /// Evaluates the request, returning the full decision.
    pub fn decide(&self) -> Decision {
        decide(self.principal, self.owner_id, self.operation)
    }

    /// Evaluates the request to a plain boolean.
    pub fn evaluate(&self) -> bool {
        self.decide().is_permitted()
    }
}

/// Decides an access request.
///
/// Read and write follow the same rule, so `operation` does not change the
/// outcome.
pub fn decide(principal: Option<&Principal>, owner_id: &str, _operation: Operation) -> Decision {
    match principal {
        Some(p) if p.is_authenticated() => {
            if p.id == owner_id {
                Decision::Permitted
            } else {
                Decision::Denied(DenyReason::NotOwner)
            }
        }
        _ => Decision::Denied(DenyReason::Unauthenticated),
    }
}

/// Returns `true` iff the principal is authenticated and owns the document.
pub fn evaluate(principal: Option<&Principal>, owner_id: &str, operation: Operation) -> bool {
    decide(principal, owner_id, operation).is_permitted()
}
