//! Test environment for exercising rules end-to-end.
//!
//! Mirrors how rules are tested against a local emulator: initialize an
//! environment with a project id and rules, obtain client contexts for
//! different users, then assert which operations succeed and which are
//! denied.
//!
//! # Example
//!
//! ```
//! use billwise_rules::harness::{assert_fails, assert_succeeds, TestConfig, TestEnvironment};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), billwise_rules::AssertionFailure> {
//! let env = TestEnvironment::initialize(TestConfig::new("billwise-test"));
//!
//! let alice = env.authenticated_context("alice");
//! let bob = env.authenticated_context("bob");
//!
//! let bill = json!({ "user_id": "alice", "title": "My Bill" });
//! assert_succeeds(alice.set("Bills/testBill", bill))?;
//! assert_succeeds(alice.get("Bills/testBill"))?;
//! assert_fails(bob.get("Bills/testBill"))?;
//!
//! env.cleanup();
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::document::{Document, DocumentPath};
use crate::error::{AssertionFailure, Result, StoreError};
use crate::request::{Principal, RequestMeta};
use crate::rules::Rules;
use crate::store::DocumentStore;

/// Settings for a [`TestEnvironment`].
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Project id, used to prefix request ids
    pub project_id: String,
    /// Rules the environment's store enforces
    pub rules: Rules,
}

impl TestConfig {
    /// Config with the default bill rules.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            rules: Rules::default(),
        }
    }

    /// Replaces the rules.
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }
}

/// An isolated store plus a source of client contexts.
#[derive(Debug)]
pub struct TestEnvironment {
    project_id: String,
    store: DocumentStore,
    next_request: AtomicU64,
}

impl TestEnvironment {
    /// Creates an environment with an empty store.
    pub fn initialize(config: TestConfig) -> Self {
        tracing::info!(
            project_id = %config.project_id,
            collections = config.rules.collections.len(),
            "rules test environment initialized"
        );
        Self {
            project_id: config.project_id,
            store: DocumentStore::new(config.rules),
            next_request: AtomicU64::new(1),
        }
    }

    /// Returns the project id.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// A client signed in as `uid`.
    pub fn authenticated_context(&self, uid: impl Into<String>) -> ClientContext<'_> {
        ClientContext {
            env: self,
            principal: Some(Principal::new(uid)),
        }
    }

    /// A client with no credentials.
    pub fn unauthenticated_context(&self) -> ClientContext<'_> {
        ClientContext {
            env: self,
            principal: None,
        }
    }

    /// Drops all documents and audit events.
    pub fn cleanup(&self) {
        self.store.clear();
        tracing::info!(project_id = %self.project_id, "rules test environment cleaned up");
    }

    fn request_meta(&self, principal: Option<&Principal>) -> RequestMeta {
        let n = self.next_request.fetch_add(1, Ordering::Relaxed);
        RequestMeta {
            request_id: format!("{}-{}", self.project_id, n),
            principal: principal.cloned(),
        }
    }
}

/// A client's view of the store, bound to one identity.
#[derive(Debug, Clone)]
pub struct ClientContext<'env> {
    env: &'env TestEnvironment,
    principal: Option<Principal>,
}

impl ClientContext<'_> {
    /// Returns the client's uid, if signed in.
    pub fn uid(&self) -> Option<&str> {
        self.principal.as_ref().map(|p| p.id.as_str())
    }

    /// Fetches the document at `path` (e.g. `"Bills/testBill"`).
    pub fn get(&self, path: &str) -> Result<Document> {
        let path: DocumentPath = path.parse()?;
        self.env.store.get(&self.meta(), &path)
    }

    /// Creates or replaces the document at `path` with a JSON object.
    pub fn set(&self, path: &str, data: Value) -> Result<()> {
        let path: DocumentPath = path.parse()?;
        let Value::Object(fields) = data else {
            return Err(StoreError::InvalidDocument(path.to_string()));
        };
        self.env.store.set(&self.meta(), &path, fields)
    }

    /// Deletes the document at `path`.
    pub fn delete(&self, path: &str) -> Result<()> {
        let path: DocumentPath = path.parse()?;
        self.env.store.delete(&self.meta(), &path)
    }

    fn meta(&self) -> RequestMeta {
        self.env.request_meta(self.principal.as_ref())
    }
}

/// Expects `result` to be a success.
///
/// # Errors
///
/// Returns `AssertionFailure::ExpectedSuccess` carrying the store error.
pub fn assert_succeeds<T>(result: Result<T>) -> Result<T, AssertionFailure> {
    result.map_err(AssertionFailure::ExpectedSuccess)
}

/// Expects `result` to be a permission denial.
///
/// # Errors
///
/// Returns `AssertionFailure::ExpectedDenial` if the operation succeeded, and
/// `AssertionFailure::UnexpectedError` if it failed for another reason.
pub fn assert_fails<T>(result: Result<T>) -> Result<StoreError, AssertionFailure> {
    match result {
        Ok(_) => Err(AssertionFailure::ExpectedDenial),
        Err(err) if err.is_permission_denied() => Ok(err),
        Err(err) => Err(AssertionFailure::UnexpectedError(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_ids_are_unique_and_prefixed() {
        let env = TestEnvironment::initialize(TestConfig::new("billwise-test"));
        let alice = env.authenticated_context("alice");

        let first = alice.meta();
        let second = alice.meta();
        assert!(first.request_id.starts_with("billwise-test-"));
        assert_ne!(first.request_id, second.request_id);
    }

    #[test]
    fn contexts_expose_uid() {
        let env = TestEnvironment::initialize(TestConfig::new("p"));
        assert_eq!(env.authenticated_context("alice").uid(), Some("alice"));
        assert_eq!(env.unauthenticated_context().uid(), None);
    }

    #[test]
    fn assert_succeeds_reports_store_error() {
        let err = StoreError::InvalidDocument("Bills/x".to_string());
        let failure = assert_succeeds::<()>(Err(err)).unwrap_err();
        assert!(matches!(failure, AssertionFailure::ExpectedSuccess(_)));
    }

    #[test]
    fn assert_fails_distinguishes_denial_from_other_errors() {
        assert_eq!(
            assert_fails(Ok(())).unwrap_err(),
            AssertionFailure::ExpectedDenial
        );

        let err = StoreError::InvalidDocument("Bills/x".to_string());
        let failure = assert_fails::<()>(Err(err)).unwrap_err();
        assert!(matches!(failure, AssertionFailure::UnexpectedError(_)));
    }

    #[test]
    fn set_rejects_non_object_data() {
        let env = TestEnvironment::initialize(TestConfig::new("p"));
        let err = env
            .authenticated_context("alice")
            .set("Bills/testBill", json!("not an object"))
            .unwrap_err();
        assert_eq!(err, StoreError::InvalidDocument("Bills/testBill".to_string()));
    }

    #[test]
    fn malformed_path_is_invalid_path() {
        let env = TestEnvironment::initialize(TestConfig::new("p"));
        let err = env.authenticated_context("alice").get("Bills").unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
    }

    #[test]
    fn cleanup_empties_the_store() {
        let env = TestEnvironment::initialize(TestConfig::new("p"));
        env.authenticated_context("alice")
            .set("Bills/a", json!({ "user_id": "alice" }))
            .unwrap();
        assert_eq!(env.store().len(), 1);

        env.cleanup();
        assert!(env.store().is_empty());
    }
}
