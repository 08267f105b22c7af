//! Error types.
//!
//! Denials are not errors at the evaluator level. They only become
//! [`StoreError::PermissionDenied`] once the store refuses the operation.

use thiserror::Error;

use crate::policy::{DenyReason, Operation};

/// Errors from loading or validating a rules file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RulesError {
    /// The rules file could not be read.
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),

    /// The rules file is not valid TOML for the rules schema.
    #[error("failed to parse rules: {0}")]
    Parse(#[from] toml::de::Error),

    /// The rules parsed but are inconsistent.
    #[error("invalid rules: {0}")]
    Invalid(String),
}

/// A document path that is not of the form `Collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid document path '{path}': {reason}")]
pub struct PathError {
    /// The rejected input
    pub path: String,
    /// What was wrong with it
    pub reason: &'static str,
}

/// Errors returned by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The rules refused the operation.
    #[error("permission denied: {operation} on {path} ({reason})")]
    PermissionDenied {
        /// Requested operation
        operation: Operation,
        /// Target document path
        path: String,
        /// Why the rules refused it
        reason: DenyReason,
    },

    /// A written document lacks a string owner field.
    #[error("document {path} has no string '{field}' owner field")]
    MissingOwner {
        /// Target document path
        path: String,
        /// Name of the configured owner field
        field: String,
    },

    /// An update tried to change the document's owner.
    #[error("owner of {path} cannot change from '{current}' to '{requested}'")]
    OwnerImmutable {
        /// Target document path
        path: String,
        /// Owner currently stored
        current: String,
        /// Owner carried by the rejected write
        requested: String,
    },

    /// Document data was not a JSON object.
    #[error("document data for {0} must be a JSON object")]
    InvalidDocument(String),

    /// The document path was malformed.
    #[error(transparent)]
    InvalidPath(#[from] PathError),
}

impl StoreError {
    /// Returns `true` if the error is a rules denial.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::PermissionDenied { .. })
    }
}

/// A rules test whose observed outcome differed from the expected one.
///
/// Kept apart from [`StoreError`] so a failed expectation is never mistaken
/// for a store fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionFailure {
    /// The operation was expected to succeed but failed.
    #[error("expected operation to succeed, but it failed: {0}")]
    ExpectedSuccess(StoreError),

    /// The operation was expected to be denied but succeeded.
    #[error("expected operation to be denied, but it succeeded")]
    ExpectedDenial,

    /// The operation failed, but not because the rules denied it.
    #[error("expected a permission denial, got: {0}")]
    UnexpectedError(StoreError),
}

/// Result alias for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
