//! Owner-only access rules for the billwise bill store.
//!
//! A user may read or write a document only if they are authenticated and
//! their uid equals the document's owner field (`user_id` by default).
//!
//! # Core Types
//!
//! - [`evaluate`] / [`decide`]: the pure access predicate
//! - [`Rules`]: which collections are protected and by which owner field
//! - [`DocumentStore`]: in-memory store that enforces [`Rules`] on every access
//! - [`harness`]: test environment with `assert_succeeds` / `assert_fails`
//! - [`audit`]: record of every permitted and denied operation
//!
//! # Examples
//!
//! ```
//! use billwise_rules::{evaluate, Operation, Principal};
//!
//! let alice = Principal::new("alice");
//! let bob = Principal::new("bob");
//!
//! assert!(evaluate(Some(&alice), "alice", Operation::Write));
//! assert!(evaluate(Some(&alice), "alice", Operation::Read));
//! assert!(!evaluate(Some(&bob), "alice", Operation::Read));
//! assert!(!evaluate(None, "alice", Operation::Read));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod document;
mod error;
pub mod harness;
mod logging;
mod policy;
mod request;
mod rules;
mod store;

pub use document::{Document, DocumentPath, Fields};
pub use error::{AssertionFailure, PathError, RulesError, StoreError};
pub use policy::{decide, evaluate, AccessRequest, Decision, DenyReason, Operation};
pub use request::{Principal, RequestMeta};
pub use rules::{CollectionRule, Rules, BILLS_COLLECTION, DEFAULT_OWNER_FIELD};
pub use store::DocumentStore;
